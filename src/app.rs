//! 终端答题界面
//!
//! 一个以论文ID为参数的单页面：展示题目、读取选项、"下一步"，
//! 加载期间不接受输入

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

use crate::clients::PaperPlayClient;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{HttpTransport, MemoryCredentialStore};
use crate::services::answer_judge::{letter_of, Verdict};
use crate::services::ErrorClassifier;
use crate::workflow::{Advance, QuestionSlot, QuizPhase, QuizSession};

type Input = Lines<BufReader<Stdin>>;

/// 应用主结构
pub struct App {
    config: Config,
    client: PaperPlayClient,
    classifier: ErrorClassifier,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        log_startup(&config);

        let credentials = Arc::new(MemoryCredentialStore::with_tokens(
            config.access_token.clone(),
            config.refresh_token.clone(),
        ));
        if credentials.is_empty() {
            warn!("⚠️ 未配置访问令牌 (PAPERPLAY_TOKEN)，接口可能要求重新登录");
        }

        let transport = HttpTransport::new(&config, credentials.clone())?;
        let client = PaperPlayClient::new(Arc::new(transport));
        let classifier = ErrorClassifier::new(credentials)
            .with_redirect_delay(Duration::from_millis(config.redirect_delay_ms));

        Ok(Self {
            config,
            client,
            classifier,
        })
    }

    /// 对一篇论文进行答题
    pub async fn run(&self, paper_id: &str) -> AppResult<()> {
        let mut session = QuizSession::new(paper_id, self.client.clone())
            .with_concept_reveal(self.config.concept_reveal());
        let mut input = BufReader::new(tokio::io::stdin()).lines();

        println!("⏳ 正在加载关卡...");
        match session.start().await {
            Ok(()) => {
                if let Some(level) = session.level() {
                    println!("📚 {}（共 {} 组题目）", level.name, session.pair_count());
                }
            }
            Err(e) => {
                if self.report(&e).await {
                    return Ok(());
                }
            }
        }

        loop {
            // 后台提交收到 401 时优先处理
            if let Some(e) = session.take_auth_failure() {
                self.report(&e).await;
                break;
            }

            match session.phase() {
                QuizPhase::AwaitingLeadIn | QuizPhase::AwaitingConcept => {
                    if !self.answer(&mut session, &mut input).await? {
                        break;
                    }
                }
                QuizPhase::LeadInRevealed | QuizPhase::ConceptRevealed => {
                    let label = session.next_action_label().unwrap_or("下一步");
                    let text = format!("回车{}（q 退出）: ", label);
                    let Some(line) = prompt(&mut input, &text).await? else {
                        break;
                    };
                    if is_quit(&line) {
                        break;
                    }
                    println!("⏳ 加载中...");
                    match session.advance().await {
                        Ok(Advance::Completed) => {
                            println!("🎉 恭喜完成所有题目！");
                            break;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            if self.report(&e).await {
                                break;
                            }
                        }
                    }
                }
                QuizPhase::Failed => {
                    let text = "输入 r 重试，其他键退出: ";
                    let Some(line) = prompt(&mut input, text).await? else {
                        break;
                    };
                    if !line.trim().eq_ignore_ascii_case("r") {
                        break;
                    }
                    if let Err(e) = session.retry().await {
                        if self.report(&e).await {
                            break;
                        }
                    }
                }
                QuizPhase::Completed | QuizPhase::Idle | QuizPhase::Loading => break,
            }
        }

        session.settle().await;
        if let Some(e) = session.take_auth_failure() {
            self.report(&e).await;
        }
        info!("答题结束 (论文 {})", paper_id);
        Ok(())
    }

    /// 展示当前题目并读取一次作答；返回 false 表示用户退出
    async fn answer(&self, session: &mut QuizSession, input: &mut Input) -> AppResult<bool> {
        let is_lead_in = session.phase() == QuizPhase::AwaitingLeadIn;
        let slot = if is_lead_in {
            session.lead_in()
        } else {
            session.concept()
        };
        let Some(slot) = slot else {
            return Ok(false);
        };
        let option_count = slot.question.content.options().len();
        let correct_letter = slot.question.answer.correct_letter().map(str::to_string);
        render_question(session, slot, is_lead_in);

        let Some(line) = prompt(input, "请选择（q 退出）: ").await? else {
            return Ok(false);
        };
        if is_quit(&line) {
            return Ok(false);
        }
        let Some(index) = parse_option(&line, option_count) else {
            println!("无效的选项: {}", line.trim());
            return Ok(true);
        };

        let verdict = if is_lead_in {
            session.select_lead_in(index)
        } else {
            session.select_concept(index)
        };
        if let Some(verdict) = verdict {
            render_verdict(verdict, correct_letter.as_deref());
        }
        Ok(true)
    }

    /// 提示错误；登录失效时等待后返回 true，调用方应退出答题
    async fn report(&self, err: &AppError) -> bool {
        let classification = self.classifier.handle(err);
        println!("⚠️ {}", classification.message);

        match classification.redirect_after {
            Some(delay) => {
                tokio::time::sleep(delay).await;
                println!("↩️ 已退出登录，请重新登录后再进入答题");
                true
            }
            None => false,
        }
    }
}

// ========== 界面辅助函数 ==========

fn render_question(session: &QuizSession, slot: &QuestionSlot, is_lead_in: bool) {
    println!("\n{}", "─".repeat(60));
    println!(
        "第 {}/{} 组 · {} · {}",
        session.current_pair_index() + 1,
        session.pair_count(),
        if is_lead_in { "引入题" } else { "概念题" },
        session.current_concept_name()
    );
    if let Some(difficulty) = slot.question.difficulty_level() {
        println!("难度: {}", difficulty.label());
    }
    println!("{}", slot.question.stem);

    let options = slot.question.content.options();
    if options.is_empty() {
        println!("（题目数据异常，无法显示选项）");
    }
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {}", letter_of(i), option);
    }
}

fn render_verdict(verdict: Verdict, correct_letter: Option<&str>) {
    if verdict.is_correct {
        println!("✅ 回答正确（{}）", verdict.selected_letter);
    } else {
        println!(
            "❌ 答案错误（你选了 {}，正确答案 {}）",
            verdict.selected_letter,
            correct_letter.unwrap_or("未知")
        );
    }
}

async fn prompt(input: &mut Input, text: &str) -> AppResult<Option<String>> {
    print!("{}", text);
    std::io::stdout().flush()?;
    Ok(input.next_line().await?)
}

fn is_quit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("q")
}

/// 解析用户输入的选项：字母（A/b）或从 1 开始的序号
///
/// `option_count` 为 0（题目数据异常）时不做范围检查。
fn parse_option(line: &str, option_count: usize) -> Option<usize> {
    let text = line.trim();
    let index = match text.parse::<usize>() {
        Ok(n) => n.checked_sub(1)?,
        Err(_) => {
            let mut chars = text.chars();
            let c = chars.next()?.to_ascii_uppercase();
            if chars.next().is_some() || !c.is_ascii_uppercase() {
                return None;
            }
            (c as u8 - b'A') as usize
        }
    };

    if option_count == 0 || index < option_count {
        Some(index)
    } else {
        None
    }
}

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 PaperPlay 答题客户端启动");
    info!("🌐 后端地址: {}", config.base_url);
    info!("📋 概念题展示方式: {:?}", config.concept_reveal());
    info!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_letters_and_numbers() {
        assert_eq!(parse_option("a", 4), Some(0));
        assert_eq!(parse_option(" C\n", 4), Some(2));
        assert_eq!(parse_option("2", 4), Some(1));
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        assert_eq!(parse_option("E", 4), None);
        assert_eq!(parse_option("0", 4), None);
        assert_eq!(parse_option("AB", 4), None);
        assert_eq!(parse_option("", 4), None);
        assert_eq!(parse_option("?", 4), None);
    }

    #[test]
    fn malformed_question_accepts_any_letter() {
        assert_eq!(parse_option("Z", 0), Some(25));
    }

    #[test]
    fn quit_is_case_insensitive() {
        assert!(is_quit(" Q "));
        assert!(!is_quit("a"));
    }
}
