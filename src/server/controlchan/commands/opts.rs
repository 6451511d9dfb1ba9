//! The RFC 2389 Options (`OPTS`) command
//
// The OPTS (options) command allows a user-PI to specify the desired
// behavior of a server-FTP process when another FTP command (the target
// command) is later issued.
//
// Only `UTF8 ON`, `UTF8 OFF` and the `UTF-8` spelling some clients send are understood. They
// switch the encoding of path names.

use crate::{
    encoding::TextEncoding,
    server::controlchan::{
        Reply, ReplyCode,
        commands::missing_argument,
        error::ControlChanError,
        handler::{Command, CommandContext},
    },
};
use async_trait::async_trait;

#[derive(Debug)]
pub struct Opts;

#[async_trait]
impl Command for Opts {
    #[tracing_attributes::instrument(skip(ctx))]
    async fn execute(&self, args: String, ctx: &mut CommandContext<'_>) -> Result<Reply, ControlChanError> {
        let mut options = args.split(' ');
        let option = options.next().unwrap_or_default();
        let encoding = if option.eq_ignore_ascii_case("UTF8") {
            match options.next() {
                Some(setting) if setting.eq_ignore_ascii_case("ON") => TextEncoding::Utf8,
                Some(setting) if setting.eq_ignore_ascii_case("OFF") => TextEncoding::Ascii,
                _ => return Ok(missing_argument()),
            }
        } else if option.eq_ignore_ascii_case("UTF-8") {
            TextEncoding::Utf8
        } else {
            return Ok(missing_argument());
        };
        ctx.session.path_encoding = encoding;
        slog::debug!(ctx.logger, "Path encoding set to {}", encoding);
        Ok(Reply::new(ReplyCode::CommandOkay, "OK"))
    }
}

#[cfg(test)]
mod tests {
    use crate::encoding::TextEncoding;
    use crate::server::controlchan::commands::testing::Harness;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn utf8_on_and_off() {
        let mut harness = Harness::logged_in();
        harness.exec("OPTS utf8 on").await;
        assert_eq!(harness.last_line(), "200 OK");
        assert_eq!(harness.session.path_encoding, TextEncoding::Utf8);

        harness.exec("OPTS UTF8 OFF").await;
        assert_eq!(harness.last_line(), "200 OK");
        assert_eq!(harness.session.path_encoding, TextEncoding::Ascii);
    }

    #[tokio::test]
    async fn utf_dash_8() {
        let mut harness = Harness::logged_in();
        harness.exec("OPTS UTF-8").await;
        assert_eq!(harness.session.path_encoding, TextEncoding::Utf8);
    }

    #[tokio::test]
    async fn bad_arguments() {
        let mut harness = Harness::logged_in();
        for line in ["OPTS", "OPTS UTF8", "OPTS UTF8 MAYBE", "OPTS MLST type;size"] {
            harness.exec(line).await;
            assert_eq!(harness.replies.last().and_then(|r| r.code()).map(|c| c as u32), Some(501), "{}", line);
        }
        assert_eq!(harness.session.path_encoding, TextEncoding::Ascii);
    }
}
