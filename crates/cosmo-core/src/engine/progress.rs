use crate::core::models::ids::ConformerId;

#[derive(Debug, Clone)]
pub enum Progress {
    StepStart { total_conformers: u64 },
    ConformerFinished { id: ConformerId, success: bool },
    StepFinish,
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_is_silent() {
        ProgressReporter::new().report(Progress::StepFinish);
    }

    #[test]
    fn reporter_forwards_events_to_callback() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| {
            seen.lock().unwrap().push(format!("{event:?}"));
        }));
        reporter.report(Progress::StepStart { total_conformers: 2 });
        reporter.report(Progress::ConformerFinished {
            id: ConformerId::new("a", 0, 0, 0),
            success: true,
        });
        reporter.report(Progress::StepFinish);
        drop(reporter);

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen[0].contains("total_conformers: 2"));
        assert!(seen[1].contains("success: true"));
    }
}
