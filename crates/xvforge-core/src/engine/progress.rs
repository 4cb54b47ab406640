/// Events emitted while a conversion runs.
///
/// A single conversion reports phases (reading, transforming, writing); a batch
/// reports one task step per document.
#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,
    /// The running phase failed; its error is returned to the caller.
    PhaseAbort,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    /// A line meant for the user, such as the reason a document failed.
    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `step` as a named phase.
    ///
    /// Reports `PhaseFinish` when the step succeeds and `PhaseAbort` when it
    /// fails, so every `PhaseStart` is closed.
    pub fn phase<T, E>(
        &self,
        name: &'static str,
        step: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        self.report(Progress::PhaseStart { name });
        let result = step();
        self.report(match result {
            Ok(_) => Progress::PhaseFinish,
            Err(_) => Progress::PhaseAbort,
        });
        result
    }
}
