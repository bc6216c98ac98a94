//! Cancellation and Ctrl+C handling.
//!
//! A single [`CancellationToken`] is created per scan and cloned into every
//! thread that can block: the directory walker, the pipeline submitter,
//! each worker, and the collector. It carries two views of the same state:
//!
//! - an `AtomicBool` for cheap polling between units of work
//!   (e.g. between chunks while hashing a file), and
//! - a crossbeam receiver that becomes ready the moment cancellation is
//!   requested, so blocked channel operations can `select!` on it.
//!
//! # Usage
//!
//! ```rust,no_run
//! use dupfind::signal::install_handler;
//!
//! let token = install_handler().expect("Failed to install signal handler");
//!
//! // Pass clones of the token to the finder / pipeline
//! let worker_token = token.clone();
//! assert!(!worker_token.is_cancelled());
//! ```
//!
//! # Exit Codes
//!
//! When a signal is received:
//! - The token is cancelled
//! - A message "Interrupted. Cleaning up..." is printed to stderr
//! - The application should exit with code 130 (128 + SIGINT)

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use crossbeam_channel::{Receiver, Sender};

/// Exit code for SIGINT (Ctrl+C) interruption.
/// This follows Unix convention: 128 + signal number (SIGINT = 2).
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

#[derive(Debug)]
struct TokenState {
    cancelled: AtomicBool,
    /// Never used to send; dropping it disconnects every receiver clone.
    trigger: Mutex<Option<Sender<()>>>,
}

/// Cooperative, process-local cancellation signal.
///
/// Cloning is cheap and every clone observes the same state. Cancellation is
/// one-way: once requested it cannot be undone on this token, create a new
/// one for the next scan.
///
/// # Thread Safety
///
/// `CancellationToken` is `Send` and `Sync`.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    state: Arc<TokenState>,
    receiver: Receiver<()>,
}

impl CancellationToken {
    /// Create a token that has not been cancelled.
    ///
    /// # Example
    ///
    /// ```
    /// use dupfind::signal::CancellationToken;
    ///
    /// let token = CancellationToken::new();
    /// let worker = token.clone();
    /// token.cancel();
    /// assert!(worker.is_cancelled());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let (trigger, receiver) = crossbeam_channel::bounded(0);
        Self {
            state: Arc::new(TokenState {
                cancelled: AtomicBool::new(false),
                trigger: Mutex::new(Some(trigger)),
            }),
            receiver,
        }
    }

    /// Check if cancellation has been requested.
    ///
    /// # Returns
    ///
    /// `true` once [`cancel`](Self::cancel) was called on any clone,
    /// including by the Ctrl+C handler.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Request cancellation.
    ///
    /// Sets the flag and wakes every thread currently blocked in a
    /// `select!` on [`CancellationToken::receiver`]. Calling it more than
    /// once is harmless.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        let trigger = match self.state.trigger.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        drop(trigger);
    }

    /// Receiver that becomes ready (disconnected) once cancellation is
    /// requested.
    ///
    /// Intended for use as one arm of `crossbeam_channel::select!`; any
    /// `recv` result on it means "cancelled".
    #[must_use]
    pub fn receiver(&self) -> &Receiver<()> {
        &self.receiver
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

/// Token that the installed Ctrl+C handler cancels.
///
/// The handler can only be registered once per process, so it cancels
/// whichever token is stored here at the time the signal arrives.
static ACTIVE_TOKEN: OnceLock<Mutex<CancellationToken>> = OnceLock::new();

/// Install a Ctrl+C handler and return a fresh token bound to it.
///
/// On the first Ctrl+C the handler cancels the active token and prints
/// "Interrupted. Cleaning up..." to stderr. Threads blocked on the
/// pipeline queues wake up through [`CancellationToken::receiver`], and the
/// scan ends with [`crate::duplicates::FinderError::Interrupted`], which
/// the binary turns into exit code [`EXIT_CODE_INTERRUPTED`].
///
/// Calling this again (e.g. from several tests) does not re-register the
/// handler. It swaps in a new token so an earlier cancellation does not
/// leak into the next run.
///
/// # Returns
///
/// A token that is not yet cancelled.
///
/// # Errors
///
/// Returns [`SignalError::InstallFailed`] if the handler could not be
/// registered and none was registered before.
///
/// # Example
///
/// ```rust,no_run
/// use dupfind::duplicates::{DuplicateFinder, FinderConfig};
/// use dupfind::signal::install_handler;
/// use std::path::Path;
///
/// let token = install_handler().expect("Failed to install signal handler");
/// let finder = DuplicateFinder::new(FinderConfig::default().with_cancellation(token));
///
/// match finder.find_duplicates(Path::new(".")) {
///     Ok((groups, _)) => println!("{} duplicate groups", groups.len()),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
pub fn install_handler() -> Result<CancellationToken, SignalError> {
    let token = CancellationToken::new();

    if let Some(slot) = ACTIVE_TOKEN.get() {
        replace_active(slot, token.clone());
        return Ok(token);
    }

    let slot = ACTIVE_TOKEN.get_or_init(|| Mutex::new(token.clone()));
    replace_active(slot, token.clone());

    match ctrlc::set_handler(on_interrupt) {
        Ok(()) => Ok(token),
        Err(ctrlc::Error::MultipleHandlers) => {
            // Registered elsewhere in this process; manual cancel still works.
            log::debug!("Ctrl+C handler already registered, using unhooked token");
            Ok(token)
        }
        Err(e) => Err(SignalError::InstallFailed(e)),
    }
}

fn replace_active(slot: &Mutex<CancellationToken>, token: CancellationToken) {
    match slot.lock() {
        Ok(mut guard) => *guard = token,
        Err(poisoned) => *poisoned.into_inner() = token,
    }
}

fn on_interrupt() {
    if let Some(slot) = ACTIVE_TOKEN.get() {
        let token = match slot.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        token.cancel();
    }

    // stderr is line-buffered, so flush explicitly
    let _ = writeln!(std::io::stderr(), "\nInterrupted. Cleaning up...");
    let _ = std::io::stderr().flush();

    log::info!("Shutdown signal received");
}
