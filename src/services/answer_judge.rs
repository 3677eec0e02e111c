//! 判题 - 业务能力层
//!
//! 纯函数：选项下标 → 字母，对照标准答案给出判定

/// 判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub is_correct: bool,
    pub selected_letter: char,
}

/// 从 0 开始的选项下标转换为字母（0 → 'A'）
///
/// 不限制选项个数，超过 26 个之后沿 Unicode 顺延；落到无效码位时返回 U+FFFD。
pub fn letter_of(index: usize) -> char {
    u32::try_from(index)
        .ok()
        .and_then(|i| ('A' as u32).checked_add(i))
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// 判题：答案缺失或为空一律判错
pub fn judge(selected_index: usize, correct_letter: Option<&str>) -> Verdict {
    let selected_letter = letter_of(selected_index);
    let is_correct = correct_letter
        .map(|correct| {
            let mut chars = correct.chars();
            chars.next() == Some(selected_letter) && chars.next().is_none()
        })
        .unwrap_or(false);

    Verdict {
        is_correct,
        selected_letter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_follow_alphabet() {
        let letters: String = (0..26).map(letter_of).collect();
        assert_eq!(letters, "ABCDEFGHIJKLMNOPQRSTUVWXYZ");

        for i in 0..40 {
            assert!(letter_of(i) < letter_of(i + 1));
        }
    }

    #[test]
    fn correct_only_on_exact_letter() {
        assert!(judge(2, Some("C")).is_correct);
        assert!(!judge(1, Some("C")).is_correct);
        assert!(!judge(2, Some("c")).is_correct);
        assert!(!judge(2, Some("CC")).is_correct);
        assert_eq!(judge(2, Some("A")).selected_letter, 'C');
    }

    #[test]
    fn missing_or_empty_key_is_wrong() {
        assert!(!judge(0, None).is_correct);
        assert!(!judge(0, Some("")).is_correct);
    }
}
