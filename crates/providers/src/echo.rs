//! Echo reply generator - answers without any model. Handy for local runs
//! and smoke tests of the whole pipeline.

use async_trait::async_trait;
use smalltalk_core::error::ReplyError;
use smalltalk_core::reply::ReplyGenerator;

pub struct EchoReply;

#[async_trait]
impl ReplyGenerator for EchoReply {
    fn name(&self) -> &str {
        "echo"
    }

    async fn reply(&self, _profile: &str, messages: &[String]) -> Result<String, ReplyError> {
        let last = messages.last().ok_or(ReplyError::EmptyContext)?;
        Ok(format!("Thank you for sending me this message: {last}"))
    }
}
