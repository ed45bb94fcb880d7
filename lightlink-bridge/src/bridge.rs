use std::time::{Duration, Instant};

use lightlink_api::LightApi;
use tokio::sync::mpsc;

use crate::configs;
use crate::errors::Result;
use crate::services::{
    Cooldown, DispatchReport, Dispatcher, SerialSession, Trigger, TriggerWords, decode_line,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank line or line ending noise
    Empty,
    /// Dropped because an earlier trigger is still inside the cooldown window
    CoolingDown(String),
    /// A trigger reached the lights
    Dispatched { trigger: Trigger, report: DispatchReport },
    /// Non-trigger output from the microcontroller
    Passthrough(String),
}

pub struct Bridge<A: ?Sized> {
    dispatcher: Dispatcher<A>,
    cooldown: Cooldown,
    words: TriggerWords,
}

impl<A> Bridge<A>
where
    A: LightApi + ?Sized,
{
    pub fn new(dispatcher: Dispatcher<A>, cooldown: Cooldown, words: TriggerWords) -> Self {
        Self {
            dispatcher,
            cooldown,
            words,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher<A> {
        &self.dispatcher
    }

    pub fn words(&self) -> &TriggerWords {
        &self.words
    }

    /// Handles one raw serial line received at `now`.
    ///
    /// The cooldown gates every non-empty line, but only lines that map to a
    /// command restart it.
    pub async fn handle_line(&mut self, raw: &[u8], now: Instant) -> LineOutcome {
        let line = decode_line(raw);
        if line.is_empty() {
            return LineOutcome::Empty;
        }

        if !self.cooldown.is_ready(now) {
            tracing::info!("[SKIP] {} (cooldown {:?})", line, self.cooldown.window());
            return LineOutcome::CoolingDown(line);
        }

        let trigger = Trigger::parse(&line, &self.words);
        match trigger.command() {
            Some(cmd) => {
                let report = self.dispatcher.dispatch(cmd).await;
                self.cooldown.mark(now);

                LineOutcome::Dispatched { trigger, report }
            }
            None => {
                tracing::info!("[UART] {}", line);
                LineOutcome::Passthrough(line)
            }
        }
    }

    /// Processes lines until the sending side closes.
    pub async fn serve(&mut self, lines: &mut mpsc::Receiver<Vec<u8>>) {
        while let Some(raw) = lines.recv().await {
            self.handle_line(&raw, Instant::now()).await;
        }
    }

    /// Keeps a serial session open, reconnecting after every failure.
    pub async fn listen(&mut self, serial: &configs::Serial) {
        self.listen_with(|| SerialSession::open(serial), serial.reconnect_delay())
            .await
    }

    /// Reconnect loop over sessions produced by `open`. Waits
    /// `reconnect_delay` after a failed open or a dropped session.
    pub async fn listen_with<F>(&mut self, mut open: F, reconnect_delay: Duration)
    where
        F: FnMut() -> Result<SerialSession>,
    {
        loop {
            match open() {
                Ok(session) => {
                    tracing::info!("Listening on {}", session.port_name());

                    let (sender, mut receiver) = mpsc::channel(32);
                    let reader = tokio::task::spawn_blocking(move || session.forward_lines(sender));

                    self.serve(&mut receiver).await;

                    match reader.await {
                        Ok(Ok(())) => tracing::debug!("serial reader stopped"),
                        Ok(Err(e)) => tracing::warn!(
                            "Serial error: {}. Reconnecting in {:?}",
                            e,
                            reconnect_delay
                        ),
                        Err(e) => tracing::error!("Serial reader task failed: {}", e),
                    }
                }
                Err(e) => tracing::warn!("Serial error: {}. Reconnecting in {:?}", e, reconnect_delay),
            }

            tokio::time::sleep(reconnect_delay).await;
        }
    }
}
