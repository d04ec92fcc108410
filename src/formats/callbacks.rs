// ssprs-profile/src/formats/callbacks.rs

use chrono::{DateTime, Utc};

/// Supplies metadata a file does not carry, typically by asking the user.
pub trait Callbacks {
    /// Latitude and longitude in decimal degrees.
    fn ask_location(&mut self) -> Option<(f64, f64)>;
    fn ask_date(&mut self) -> Option<DateTime<Utc>>;
}

/// Never answers.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCallbacks;

impl Callbacks for NoCallbacks {
    fn ask_location(&mut self) -> Option<(f64, f64)> {
        None
    }

    fn ask_date(&mut self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Always gives the same answers, e.g. from command line options.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedCallbacks {
    pub location: Option<(f64, f64)>,
    pub date: Option<DateTime<Utc>>,
}

impl Callbacks for FixedCallbacks {
    fn ask_location(&mut self) -> Option<(f64, f64)> {
        self.location
    }

    fn ask_date(&mut self) -> Option<DateTime<Utc>> {
        self.date
    }
}
