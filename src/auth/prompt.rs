use crate::error::{Result, SsoError};
use async_trait::async_trait;
use std::io::{self, BufRead, BufReader, Read};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;

/// The user-facing half of the device flow
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginPrompt: Send + Sync {
    /// Show the verification URL and try to get it in front of the user
    fn show_verification_url(&self, url: &str);

    /// Block until the user says the browser login is done
    async fn wait_for_confirmation(&self) -> Result<()>;
}

/// Launches a URL in the user's browser
pub type BrowserOpener = Box<dyn Fn(&str) -> io::Result<()> + Send + Sync>;

/// Prompt on stderr, browser launch, ENTER on an input stream (stdin by default)
pub struct TerminalPrompt<R = io::Stdin> {
    open_browser: bool,
    timeout: Option<Duration>,
    // Taken by the first confirmation; the reader moves to its own thread.
    input: Mutex<Option<R>>,
    opener: BrowserOpener,
}

impl TerminalPrompt<io::Stdin> {
    pub fn new(open_browser: bool, timeout: Option<Duration>) -> Self {
        Self::with_io(
            open_browser,
            timeout,
            io::stdin(),
            Box::new(|url: &str| webbrowser::open(url)),
        )
    }
}

impl<R> TerminalPrompt<R>
where
    R: Read + Send + 'static,
{
    pub fn with_io(
        open_browser: bool,
        timeout: Option<Duration>,
        input: R,
        opener: BrowserOpener,
    ) -> Self {
        Self {
            open_browser,
            timeout,
            input: Mutex::new(Some(input)),
            opener,
        }
    }
}

#[async_trait]
impl<R> LoginPrompt for TerminalPrompt<R>
where
    R: Read + Send + 'static,
{
    fn show_verification_url(&self, url: &str) {
        eprintln!("\nIf browser is not opened automatically, please open link:");
        eprintln!("{}", url);

        if self.open_browser && !url.is_empty() {
            if let Err(e) = (self.opener)(url) {
                eprintln!("Could not open browser automatically: {}", e);
            }
        } else {
            tracing::debug!("Skipping browser launch");
        }
    }

    async fn wait_for_confirmation(&self) -> Result<()> {
        eprintln!("Press ENTER key once login is done");

        let input = self
            .input
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        let Some(input) = input else {
            tracing::debug!("Input already consumed, not waiting");
            return Ok(());
        };

        // A blocking read can't be cancelled, so it gets a detached thread that
        // is never joined; a timeout simply stops listening to it.
        let (tx, rx) = oneshot::channel();
        std::thread::Builder::new()
            .name("confirm-login".to_string())
            .spawn(move || {
                // content is ignored, so bytes rather than a UTF-8 line
                let mut line = Vec::new();
                let _ = tx.send(BufReader::new(input).read_until(b'\n', &mut line));
            })?;

        // a dropped sender means the reader thread died; treat it like EOF
        let read = async { rx.await.unwrap_or(Ok(0)) };

        let bytes = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, read)
                .await
                .map_err(|_| SsoError::ConfirmationTimeout(limit))??,
            None => read.await?,
        };

        if bytes == 0 {
            tracing::debug!("Input closed, continuing");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::time::Instant;

    /// A reader whose read never returns, like a terminal nobody types into
    struct Stalled;

    impl Read for Stalled {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            loop {
                std::thread::park();
            }
        }
    }

    fn recording_opener() -> (BrowserOpener, Arc<Mutex<Vec<String>>>) {
        let opened = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&opened);
        let opener: BrowserOpener = Box::new(move |url: &str| {
            log.lock().unwrap().push(url.to_string());
            Ok(())
        });
        (opener, opened)
    }

    fn prompt_with_input<R: Read + Send + 'static>(
        input: R,
        timeout: Option<Duration>,
    ) -> TerminalPrompt<R> {
        let (opener, _) = recording_opener();
        TerminalPrompt::with_io(false, timeout, input, opener)
    }

    #[tokio::test]
    async fn test_timeout_fires_on_stalled_input() {
        let prompt = prompt_with_input(Stalled, Some(Duration::from_millis(50)));

        let started = Instant::now();
        let outcome = tokio::time::timeout(Duration::from_secs(5), prompt.wait_for_confirmation())
            .await
            .expect("timeout did not fire");

        assert!(matches!(outcome, Err(SsoError::ConfirmationTimeout(d)) if d == Duration::from_millis(50)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_enter_confirms() {
        let prompt = prompt_with_input(Cursor::new(b"\n".to_vec()), Some(Duration::from_secs(5)));
        prompt.wait_for_confirmation().await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_input_confirms() {
        let prompt = prompt_with_input(io::empty(), None);
        prompt.wait_for_confirmation().await.unwrap();
    }

    #[tokio::test]
    async fn test_line_content_is_ignored() {
        let prompt = prompt_with_input(Cursor::new(vec![0xff, 0xfe, 0x80, b'\n']), None);
        prompt.wait_for_confirmation().await.unwrap();
    }

    #[tokio::test]
    async fn test_second_confirmation_does_not_block() {
        let prompt = prompt_with_input(Cursor::new(b"done\n".to_vec()), None);
        prompt.wait_for_confirmation().await.unwrap();
        prompt.wait_for_confirmation().await.unwrap();
    }

    #[test]
    fn test_browser_opened_with_url() {
        let (opener, opened) = recording_opener();
        let prompt = TerminalPrompt::with_io(true, None, io::empty(), opener);

        prompt.show_verification_url("https://device.sso.us-east-1.amazonaws.com/?user_code=AB");
        assert_eq!(
            *opened.lock().unwrap(),
            vec!["https://device.sso.us-east-1.amazonaws.com/?user_code=AB"]
        );
    }

    #[test]
    fn test_browser_skipped_for_empty_url() {
        let (opener, opened) = recording_opener();
        let prompt = TerminalPrompt::with_io(true, None, io::empty(), opener);

        prompt.show_verification_url("");
        assert!(opened.lock().unwrap().is_empty());
    }

    #[test]
    fn test_browser_skipped_when_headless() {
        let (opener, opened) = recording_opener();
        let prompt = TerminalPrompt::with_io(false, None, io::empty(), opener);

        prompt.show_verification_url("https://device.sso.us-east-1.amazonaws.com/");
        assert!(opened.lock().unwrap().is_empty());
    }

    #[test]
    fn test_browser_failure_is_not_fatal() {
        let prompt = TerminalPrompt::with_io(
            true,
            None,
            io::empty(),
            Box::new(|_: &str| Err(io::Error::new(io::ErrorKind::NotFound, "no browser"))),
        );
        prompt.show_verification_url("https://device.sso.us-east-1.amazonaws.com/");
    }
}
