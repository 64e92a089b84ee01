use std::collections::VecDeque;
use std::io;

use async_trait::async_trait;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin, Stdout,
};

/// The line-oriented terminal the session talks through.
#[async_trait]
pub trait ConsoleIo: Send {
    /// Shows `prompt` and reads one line without its line ending.
    /// `Ok(None)` means the input is exhausted.
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    async fn write_line(&mut self, text: &str) -> io::Result<()>;
}

/// Line console over any async reader/writer pair.
pub struct LineConsole<R, W> {
    lines: Lines<BufReader<R>>,
    writer: W,
}

/// stdin / stdout.
pub type StdConsole = LineConsole<Stdin, Stdout>;

impl StdConsole {
    pub fn new() -> Self {
        LineConsole::with_io(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> LineConsole<R, W>
where
    R: AsyncRead + Unpin,
{
    pub fn with_io(reader: R, writer: W) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<R, W> ConsoleIo for LineConsole<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.writer.write_all(prompt.as_bytes()).await?;
        self.writer.flush().await?;
        self.lines.next_line().await
    }

    async fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }
}

/// Replays canned answers and records everything written. Used to drive a
/// session without a terminal.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Prompts and written lines, in order.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn output(&self) -> String {
        self.transcript.join("\n")
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

#[async_trait]
impl ConsoleIo for ScriptedConsole {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.transcript.push(prompt.to_string());
        Ok(self.inputs.pop_front())
    }

    async fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.transcript.push(text.to_string());
        Ok(())
    }
}
