use crate::domain::ports::QuestionGuard;
use crate::utils::error::{RelayError, Result};

/// 拒絕超過字元上限的問題，其餘原樣放行
#[derive(Debug, Clone, Copy)]
pub struct LengthLimitGuard {
    max_chars: usize,
}

impl LengthLimitGuard {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl QuestionGuard for LengthLimitGuard {
    fn screen(&self, question: &str) -> Result<String> {
        let length = question.chars().count();
        if length > self.max_chars {
            return Err(RelayError::QuestionRejected {
                reason: format!(
                    "question is {} characters long, the limit is {}",
                    length, self.max_chars
                ),
            });
        }
        Ok(question.to_string())
    }
}
