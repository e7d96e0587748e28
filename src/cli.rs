//! Interactive triage session over stdin/stdout.
//!
//! Plays the part of the assign panel: shows the current candidate, takes
//! accept/skip decisions, and edits settings. Decisions are only forwarded to
//! the queue while it is presenting.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, error, warn};

use crate::error::{ClientError, Error};
use crate::triage::{
    CandidateFetcher, PersistHandle, QueueState, SettingsView, TriageQueue, TriageSettings,
};

const HELP: &str = "\
commands:
  a, accept            add the current email to the task list
  s, skip              skip the current email
  r, reload            fetch emails again
  settings             open settings
    add <phrase>       add a subject line phrase
    remove <phrase>    remove a subject line phrase
    unread             toggle unread-only
    days + | days -    widen or narrow the day window
    confirm            apply settings and reload
    revert             discard settings changes
  q, quit              exit";

/// Settings sub-commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsCommand {
    Open,
    Add(String),
    Remove(String),
    ToggleUnread,
    DaysUp,
    DaysDown,
    Confirm,
    Revert,
}

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Accept,
    Skip,
    Reload,
    Show,
    Help,
    Quit,
    Settings(SettingsCommand),
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match (head, rest) {
            ("a" | "accept", "") => Self::Accept,
            ("s" | "skip", "") => Self::Skip,
            ("r" | "reload", "") => Self::Reload,
            ("" | "show", "") => Self::Show,
            ("h" | "help" | "?", "") => Self::Help,
            ("q" | "quit" | "exit", "") => Self::Quit,
            ("settings", "") => Self::Settings(SettingsCommand::Open),
            ("add", phrase) if !phrase.is_empty() => {
                Self::Settings(SettingsCommand::Add(phrase.to_string()))
            }
            ("remove", phrase) if !phrase.is_empty() => {
                Self::Settings(SettingsCommand::Remove(phrase.to_string()))
            }
            ("unread", "") => Self::Settings(SettingsCommand::ToggleUnread),
            ("days", "+") => Self::Settings(SettingsCommand::DaysUp),
            ("days", "-") => Self::Settings(SettingsCommand::DaysDown),
            ("confirm", "") => Self::Settings(SettingsCommand::Confirm),
            ("revert", "") => Self::Settings(SettingsCommand::Revert),
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// What the session wants the caller to do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

/// One signed-in triage session.
pub struct Session {
    fetcher: CandidateFetcher,
    settings: TriageSettings,
    queue: Option<TriageQueue>,
    /// Writes for accepted candidates that have not been reported yet.
    pending: Vec<PersistHandle>,
    signed_out: bool,
}

impl Session {
    pub fn new(fetcher: CandidateFetcher, settings: TriageSettings) -> Self {
        Self {
            fetcher,
            settings,
            queue: None,
            pending: Vec::new(),
            signed_out: false,
        }
    }

    /// Accepted candidates whose write has not been reported yet.
    pub fn pending_saves(&self) -> usize {
        self.pending.len()
    }

    pub fn queue(&self) -> Option<&TriageQueue> {
        self.queue.as_ref()
    }

    pub fn settings(&self) -> &TriageSettings {
        &self.settings
    }

    /// Rebuild the queue with the current filter.
    ///
    /// On failure the previous queue stays installed.
    pub async fn reload(&mut self) -> Result<(), ClientError> {
        let queue = self.fetcher.load(self.settings.filter()).await?;
        self.queue = Some(queue);
        Ok(())
    }

    /// Current panel text.
    pub fn status(&self) -> String {
        if self.settings.view() == SettingsView::Settings {
            let draft = self.settings.draft();
            return format!(
                "[settings] phrases: {} | unread only: {} | days: {}",
                draft.subject_phrases.join(", "),
                draft.unread_only,
                draft.day_window
            );
        }

        let Some(queue) = &self.queue else {
            return "No emails loaded".to_string();
        };
        match queue.current_item() {
            Some(current) => format!(
                "{} suspected action items\n{}",
                queue.remaining_count(),
                current.display_line()
            ),
            None => "0 suspected action items".to_string(),
        }
    }

    /// Apply one command.
    ///
    /// Authorization failures, from a reload or from an earlier write, end the
    /// session with an error so the caller can send the user back through
    /// sign-in.
    pub async fn handle(&mut self, command: Command) -> Result<Outcome, Error> {
        self.reap_finished().await?;

        match command {
            Command::Quit => return Ok(Outcome::Quit),
            Command::Help => return Ok(Outcome::Continue(HELP.to_string())),
            Command::Unknown(line) => {
                return Ok(Outcome::Continue(format!(
                    "Unknown command: {line:?} (type help)"
                )));
            }
            Command::Show => {}
            Command::Reload => self.reload_or_report().await?,
            Command::Accept => {
                if let Some(msg) = self.decide(true)? {
                    return Ok(Outcome::Continue(msg));
                }
            }
            Command::Skip => {
                if let Some(msg) = self.decide(false)? {
                    return Ok(Outcome::Continue(msg));
                }
            }
            Command::Settings(cmd) => {
                if let Some(msg) = self.apply_settings(cmd).await? {
                    return Ok(Outcome::Continue(msg));
                }
            }
        }
        Ok(Outcome::Continue(self.status()))
    }

    async fn reload_or_report(&mut self) -> Result<(), Error> {
        match self.reload().await {
            Ok(()) => Ok(()),
            Err(e) if e.is_auth() => Err(e.into()),
            Err(e) => {
                error!(error = %e, "Failed to load emails");
                Ok(())
            }
        }
    }

    /// Accept or skip the current candidate. Returns a message when nothing
    /// was decided.
    fn decide(&mut self, accept: bool) -> Result<Option<String>, Error> {
        if self.settings.view() == SettingsView::Settings {
            return Ok(Some("Confirm or revert settings first".to_string()));
        }
        let Some(queue) = self.queue.as_mut() else {
            return Ok(Some("No emails loaded".to_string()));
        };
        if queue.state() == QueueState::Empty {
            return Ok(Some("Nothing left to triage".to_string()));
        }

        if accept {
            self.pending.push(queue.accept_current()?);
        } else {
            queue.skip_current()?;
        }
        Ok(None)
    }

    /// Wait for every outstanding write and report how it went.
    ///
    /// Fails with an authorization error if any write was rejected for one.
    pub async fn drain(&mut self) -> Result<(), Error> {
        for handle in std::mem::take(&mut self.pending) {
            self.report(handle).await;
        }
        self.ensure_signed_in()
    }

    async fn reap_finished(&mut self) -> Result<(), Error> {
        let (done, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(PersistHandle::is_finished);
        self.pending = pending;
        for handle in done {
            self.report(handle).await;
        }
        self.ensure_signed_in()
    }

    async fn report(&mut self, handle: PersistHandle) {
        let id = handle.candidate().id.clone();
        match handle.outcome().await {
            Ok(item) => debug!(candidate_id = %id, task_id = %item.id, "Task saved"),
            Err(e) if e.is_auth() => {
                error!(candidate_id = %id, "Session expired while saving task, sign in again");
                self.signed_out = true;
            }
            Err(e) => warn!(candidate_id = %id, error = %e, "Task was not saved"),
        }
    }

    fn ensure_signed_in(&self) -> Result<(), Error> {
        if self.signed_out {
            return Err(ClientError::Auth.into());
        }
        Ok(())
    }

    async fn apply_settings(&mut self, cmd: SettingsCommand) -> Result<Option<String>, Error> {
        if cmd != SettingsCommand::Open && self.settings.view() != SettingsView::Settings {
            return Ok(Some("Open settings first".to_string()));
        }

        match cmd {
            SettingsCommand::Open => self.settings.open_settings(),
            SettingsCommand::Add(phrase) => {
                if let Err(e) = self.settings.add_phrase(&phrase) {
                    return Ok(Some(e.to_string()));
                }
            }
            SettingsCommand::Remove(phrase) => {
                self.settings.remove_phrase(&phrase);
            }
            SettingsCommand::ToggleUnread => {
                self.settings.toggle_unread_only();
            }
            SettingsCommand::DaysUp => {
                self.settings.increment_days();
            }
            SettingsCommand::DaysDown => {
                self.settings.decrement_days();
            }
            SettingsCommand::Revert => self.settings.revert(),
            SettingsCommand::Confirm => match self.settings.confirm() {
                Ok(true) => self.reload_or_report().await?,
                Ok(false) => {}
                Err(e) => return Ok(Some(e.to_string())),
            },
        }
        Ok(None)
    }
}

/// Read commands from stdin until quit or EOF.
pub async fn run_stdin(session: &mut Session) -> Result<(), Error> {
    run_lines(session, BufReader::new(tokio::io::stdin())).await
}

/// Drive `session` from `input` until quit or EOF. Outstanding writes are
/// awaited before returning.
pub async fn run_lines<R>(session: &mut Session, input: R) -> Result<(), Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    println!("{}", session.status());
    eprint!("> ");

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Error reading stdin: {}", e);
                break;
            }
        };

        let outcome = match session.handle(Command::parse(&line)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let _ = session.drain().await;
                return Err(e);
            }
        };
        match outcome {
            Outcome::Continue(text) => println!("{text}"),
            Outcome::Quit => break,
        }
        eprint!("> ");
    }
    session.drain().await
}
