mod tracking_janitor;

pub use tracking_janitor::TrackingJanitor;
