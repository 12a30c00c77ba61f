use std::io::{BufRead, BufReader, Read, Write};

use anyhow::{bail, Result};

use shoji_ipc::{Command, Response};

pub struct IpcClient<S> {
    stream: S,
}

#[cfg(windows)]
impl IpcClient<std::fs::File> {
    pub fn connect() -> Result<Self> {
        use anyhow::Context;

        let stream = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(super::PIPE_NAME)
            .context("Failed to connect to shoji daemon")?;
        Ok(Self::new(stream))
    }
}

impl<S: Read + Write> IpcClient<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    pub fn send(&mut self, cmd: &Command) -> Result<Response> {
        let json = serde_json::to_string(cmd)?;
        writeln!(self.stream, "{}", json)?;
        self.stream.flush()?;

        let mut reader = BufReader::new(&mut self.stream);
        let mut line = String::new();
        reader.read_line(&mut line)?;
        if line.is_empty() {
            bail!("Connection closed before a response arrived");
        }

        let response: Response = serde_json::from_str(&line)?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Canned reply on the read side, captured request on the write side.
    struct MockStream {
        reply: Cursor<Vec<u8>>,
        written: Vec<u8>,
    }

    impl MockStream {
        fn new(reply: &str) -> Self {
            Self {
                reply: Cursor::new(reply.as_bytes().to_vec()),
                written: Vec::new(),
            }
        }
    }

    impl Read for MockStream {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.reply.read(buf)
        }
    }

    impl Write for MockStream {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.written.write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_send_writes_one_json_line() {
        let mut client = IpcClient::new(MockStream::new("{\"type\":\"ok\"}\n"));
        let response = client.send(&Command::ToggleTopmost { window_id: 42 }).unwrap();

        assert_eq!(response, Response::Ok);
        let written = String::from_utf8(client.stream.written.clone()).unwrap();
        assert_eq!(written, "{\"type\":\"toggle_topmost\",\"window_id\":42}\n");
    }

    #[test]
    fn test_send_parses_error_response() {
        let mut client = IpcClient::new(MockStream::new(
            "{\"type\":\"error\",\"message\":\"Window 7 is not tracked\"}\n",
        ));
        let response = client.send(&Command::ToggleTopmost { window_id: 7 }).unwrap();
        assert_eq!(
            response,
            Response::Error {
                message: "Window 7 is not tracked".to_string()
            }
        );
    }

    #[test]
    fn test_send_fails_on_closed_connection() {
        let mut client = IpcClient::new(MockStream::new(""));
        let err = client.send(&Command::Refresh).unwrap_err();
        assert!(err.to_string().contains("Connection closed"));
    }

    #[test]
    fn test_send_fails_on_garbage() {
        let mut client = IpcClient::new(MockStream::new("not json\n"));
        assert!(client.send(&Command::GetState).is_err());
    }
}
