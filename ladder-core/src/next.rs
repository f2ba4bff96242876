//! # Continuation
//!
//! [`Next`] is the handle a handler receives to hand control on. It records
//! where in which stack the dispatch currently is, and what to do when that
//! stack runs out.
//!
//! # Dispatch modes
//!
//! A dispatch is either in *normal* mode (no error active) or *error* mode.
//! Walking a stack, each entry whose pattern matches the current path is
//! considered:
//!
//! | Mode   | Normal handler | Error handler |
//! |--------|----------------|---------------|
//! | normal | invoked        | skipped       |
//! | error  | skipped        | invoked       |
//!
//! When the stack is exhausted, control moves to the enclosing stack (for a
//! mounted app) or to the [`Terminal`].
//!
//! # Faults
//!
//! A handler that returns `Err`, or panics, before advancing is treated as if
//! it had called [`Next::fail`]. A fault raised *after* advancing is logged
//! and dropped: the rest of the chain has already run.
//!
//! [`Terminal`]: crate::Terminal

use crate::{
    app::Entry,
    error::{BoxError, DispatchError, HandlerResult},
    handler::{Handler, Layer},
    request::Request,
    response::Response,
    terminal::Terminal,
    verb::Verb,
};
use futures::{
    FutureExt,
    future::{BoxFuture, Future},
};
use std::{
    fmt,
    panic::AssertUnwindSafe,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

/// The continuation handed to every handler.
///
/// Consumed by [`run`](Self::run), [`fail`](Self::fail) or
/// [`skip_route`](Self::skip_route), so a handler can advance at most once.
/// Dropping it without advancing ends the dispatch where it stands.
///
/// # Chain depth
///
/// Advancing nests the rest of the dispatch inside the current handler's
/// future, so every handler that advances adds a boxed frame to the stack of
/// the polling task. Mounted apps and verb routers count too. A few hundred
/// advancing handlers in one dispatch can overflow a 2 MiB thread stack in a
/// debug build, so the worker stack size bounds the usable chain depth.
pub struct Next<'a> {
    frame: Frame<'a>,
    advanced: Option<&'a AtomicBool>,
}

#[derive(Clone, Copy)]
enum Frame<'a> {
    /// Inside an app's stack.
    Stack {
        entries: &'a [Entry],
        index: usize,
        exit: &'a Exit<'a>,
    },
    /// Inside a verb router.
    Verbs {
        verbs: &'a [(Verb, Arc<dyn Handler>)],
        index: usize,
        owner: &'a Next<'a>,
    },
}

/// Where control goes once a stack is exhausted.
pub(crate) enum Exit<'a> {
    /// The outermost app: finish the dispatch.
    Terminal(&'a dyn Terminal),
    /// A mounted app: restore the path and continue in the enclosing stack.
    Parent {
        original_path: String,
        parent: Next<'a>,
    },
}

/// The signal a handler resumes the dispatch with.
pub(crate) enum Signal {
    Continue,
    Error(BoxError),
    SkipRoute,
}

impl Signal {
    fn from_error(error: Option<BoxError>) -> Self {
        match error {
            Some(error) => Signal::Error(error),
            None => Signal::Continue,
        }
    }
}

impl<'a> Next<'a> {
    /// Start at the head of `entries`.
    pub(crate) fn stack(entries: &'a [Entry], exit: &'a Exit<'a>) -> Self {
        Self {
            frame: Frame::Stack {
                entries,
                index: 0,
                exit,
            },
            advanced: None,
        }
    }

    /// Start at the head of a verb router owned by `owner`.
    pub(crate) fn verbs(verbs: &'a [(Verb, Arc<dyn Handler>)], owner: &'a Next<'a>) -> Self {
        Self {
            frame: Frame::Verbs {
                verbs,
                index: 0,
                owner,
            },
            advanced: None,
        }
    }

    /// Continue in normal mode with the next matching handler.
    pub fn run<'r>(self, req: &'r mut Request, res: &'r mut Response) -> BoxFuture<'r, ()>
    where
        'a: 'r,
    {
        self.resume(req, res, Signal::Continue)
    }

    /// Switch to error mode: continue with the next matching error handler.
    pub fn fail<'r>(
        self,
        req: &'r mut Request,
        res: &'r mut Response,
        error: impl Into<BoxError>,
    ) -> BoxFuture<'r, ()>
    where
        'a: 'r,
    {
        self.resume(req, res, Signal::Error(error.into()))
    }

    /// Skip the remaining handlers of the current verb router.
    ///
    /// Outside a verb router this is the same as [`run`](Self::run).
    pub fn skip_route<'r>(self, req: &'r mut Request, res: &'r mut Response) -> BoxFuture<'r, ()>
    where
        'a: 'r,
    {
        self.resume(req, res, Signal::SkipRoute)
    }

    fn fork(&self) -> Next<'a> {
        Next {
            frame: self.frame,
            advanced: self.advanced,
        }
    }

    pub(crate) fn resume<'r>(
        self,
        req: &'r mut Request,
        res: &'r mut Response,
        signal: Signal,
    ) -> BoxFuture<'r, ()>
    where
        'a: 'r,
    {
        if let Some(advanced) = self.advanced {
            advanced.store(true, Ordering::Release);
        }
        match self.frame {
            Frame::Stack {
                entries,
                index,
                exit,
            } => Box::pin(advance_stack(entries, index, exit, req, res, signal)),
            Frame::Verbs {
                verbs,
                index,
                owner,
            } => Box::pin(advance_verbs(verbs, index, owner, req, res, signal)),
        }
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (frame, index) = match self.frame {
            Frame::Stack { index, .. } => ("stack", index),
            Frame::Verbs { index, .. } => ("verbs", index),
        };
        f.debug_struct("Next")
            .field("frame", &frame)
            .field("index", &index)
            .finish()
    }
}

// ============================================================================
// Stack walk
// ============================================================================

async fn advance_stack<'r>(
    entries: &'r [Entry],
    mut index: usize,
    exit: &'r Exit<'r>,
    req: &'r mut Request,
    res: &'r mut Response,
    signal: Signal,
) {
    let mut error = match signal {
        Signal::Error(error) => Some(error),
        Signal::Continue | Signal::SkipRoute => None,
    };

    while let Some(entry) = entries.get(index) {
        index += 1;

        let Some(found) = entry.matcher.matches(req.path()) else {
            continue;
        };

        let guard = AtomicBool::new(false);
        let next = Next {
            frame: Frame::Stack {
                entries,
                index,
                exit,
            },
            advanced: Some(&guard),
        };

        req.set_match(found);

        error = match (&entry.layer, error) {
            (Layer::Normal(handler), None) => {
                let fault = catch(async { handler.call(&mut *req, &mut *res, next).await }).await;
                let Some(error) = settle(fault, &guard, entry.matcher.pattern()) else {
                    return;
                };
                Some(error)
            }
            (Layer::Error(handler), Some(error)) => {
                let fault =
                    catch(async { handler.call(error, &mut *req, &mut *res, next).await }).await;
                let Some(error) = settle(fault, &guard, entry.matcher.pattern()) else {
                    return;
                };
                Some(error)
            }
            (layer, error) => {
                tracing::trace!(
                    pattern = entry.matcher.pattern(),
                    kind = ?layer.kind(),
                    error_active = error.is_some(),
                    "handler kind does not fit dispatch mode, skipped"
                );
                error
            }
        };
    }

    match exit {
        Exit::Terminal(terminal) => terminal.finish(error, req, res),
        Exit::Parent {
            original_path,
            parent,
        } => {
            req.set_path(original_path.clone());
            parent
                .fork()
                .resume(req, res, Signal::from_error(error))
                .await;
        }
    }
}

// ============================================================================
// Verb router walk
// ============================================================================

async fn advance_verbs<'r>(
    verbs: &'r [(Verb, Arc<dyn Handler>)],
    mut index: usize,
    owner: &'r Next<'r>,
    req: &'r mut Request,
    res: &'r mut Response,
    signal: Signal,
) {
    match signal {
        Signal::Continue => {}
        Signal::SkipRoute => return owner.fork().resume(req, res, Signal::Continue).await,
        Signal::Error(error) => return owner.fork().resume(req, res, Signal::Error(error)).await,
    }

    while let Some((verb, handler)) = verbs.get(index) {
        index += 1;

        if !verb.accepts(req.method()) {
            continue;
        }

        let guard = AtomicBool::new(false);
        let next = Next {
            frame: Frame::Verbs {
                verbs,
                index,
                owner,
            },
            advanced: Some(&guard),
        };

        let fault = catch(async { handler.call(&mut *req, &mut *res, next).await }).await;
        let Some(error) = settle(fault, &guard, verb.as_str()) else {
            return;
        };
        return owner.fork().resume(req, res, Signal::Error(error)).await;
    }

    owner.fork().resume(req, res, Signal::Continue).await
}

// ============================================================================
// Fault handling
// ============================================================================

/// Poll a handler future, turning a panic into a [`DispatchError::Panic`].
async fn catch<F>(invocation: F) -> Option<BoxError>
where
    F: Future<Output = HandlerResult>,
{
    match AssertUnwindSafe(invocation).catch_unwind().await {
        Ok(Ok(())) => None,
        Ok(Err(error)) => Some(error),
        Err(payload) => Some(DispatchError::from_panic(payload).into()),
    }
}

/// Decide what a handler's fault means for the dispatch.
///
/// Returns the error to continue with, or `None` when the dispatch is over
/// as far as this handler is concerned.
fn settle(fault: Option<BoxError>, guard: &AtomicBool, at: &str) -> Option<BoxError> {
    let error = fault?;
    if guard.load(Ordering::Acquire) {
        tracing::warn!(at, %error, "handler failed after advancing, error dropped");
        return None;
    }
    tracing::debug!(at, %error, "handler failed, switching to error mode");
    Some(error)
}
