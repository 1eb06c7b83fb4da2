use crate::response::{parse_response_line, ParsedResponse};
use crate::ProbeError;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

const MAX_LINE_LEN: usize = 4096;

/// A single TCP connection to one MX host, carrying the read buffer across
/// commands the way the teacher's `SmtpClient` does.
pub(crate) struct Dialog {
    stream: TcpStream,
    read_buffer: Vec<u8>,
}

impl Dialog {
    pub(crate) async fn connect(host: &str, port: u16, timeout_dur: Duration) -> Result<Self, ProbeError> {
        let addr = format!("{host}:{port}");
        let stream = timeout(timeout_dur, TcpStream::connect(&addr))
            .await
            .map_err(|_| ProbeError::Timeout { stage: "connect" })?
            .map_err(|err| ProbeError::Connect(err.to_string()))?;
        stream.set_nodelay(true).ok();
        Ok(Self {
            stream,
            read_buffer: Vec::with_capacity(1024),
        })
    }

    async fn read_line(&mut self, timeout_dur: Duration) -> Result<String, ProbeError> {
        loop {
            if let Some(pos) = find_crlf(&self.read_buffer) {
                let line = String::from_utf8_lossy(&self.read_buffer[..pos]).into_owned();
                self.read_buffer.drain(0..pos + 2);
                return Ok(line);
            }
            if self.read_buffer.len() > MAX_LINE_LEN {
                return Err(ProbeError::MalformedResponse("response line too long".into()));
            }

            let mut chunk = [0u8; 1024];
            let n = timeout(timeout_dur, self.stream.read(&mut chunk))
                .await
                .map_err(|_| ProbeError::Timeout { stage: "read" })?
                .map_err(|err| ProbeError::Io(err.to_string()))?;
            if n == 0 {
                return Err(ProbeError::Io("connection closed by peer".into()));
            }
            self.read_buffer.extend_from_slice(&chunk[..n]);
        }
    }

    /// Reads a (possibly multi-line) response, respecting the `250-`
    /// continuation indicator, and returns the first line's code plus the
    /// joined message content.
    pub(crate) async fn read_response(&mut self, timeout_dur: Duration) -> Result<ParsedResponse, ProbeError> {
        let first = self.read_line(timeout_dur).await?;
        let parsed = parse_response_line(&first)
            .ok_or_else(|| ProbeError::MalformedResponse(first.clone()))?;
        let code = parsed.code;
        let mut message = parsed.content.to_string();
        let mut is_final = parsed.is_final;

        while !is_final {
            let next = self.read_line(timeout_dur).await?;
            let parsed = parse_response_line(&next)
                .ok_or_else(|| ProbeError::MalformedResponse(next.clone()))?;
            message.push('\n');
            message.push_str(parsed.content);
            is_final = parsed.is_final;
        }

        Ok(ParsedResponse { code, message })
    }

    pub(crate) async fn write_line(&mut self, line: &str, timeout_dur: Duration) -> Result<(), ProbeError> {
        let mut data = line.as_bytes().to_vec();
        data.extend_from_slice(b"\r\n");
        timeout(timeout_dur, self.stream.write_all(&data))
            .await
            .map_err(|_| ProbeError::Timeout { stage: "write" })?
            .map_err(|err| ProbeError::Io(err.to_string()))?;
        Ok(())
    }

    /// Sends QUIT and ignores any error — the socket is torn down either
    /// way once this returns.
    pub(crate) async fn quit(&mut self) {
        let _ = self.write_line("QUIT", Duration::from_millis(500)).await;
    }
}

fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_crlf_in_buffer() {
        assert_eq!(find_crlf(b"250 OK\r\nrest"), Some(6));
        assert_eq!(find_crlf(b"no terminator"), None);
    }
}
