pub mod config;
pub mod run;
pub mod session;

use focuscycle_core::NewCycle;

/// Intake form check, reported per field ("task: task is required").
pub fn intake(task: &str, minutes: i64) -> Result<NewCycle, String> {
    NewCycle::new(task, minutes).map_err(|e| format!("{}: {e}", e.field()))
}

pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intake_reports_field_names() {
        assert_eq!(intake("", 25).unwrap_err(), "task: task is required");
        assert!(intake("Draft", 0).unwrap_err().starts_with("minutes: "));
        assert_eq!(intake(" Draft ", 25).unwrap().task(), "Draft");
    }
}
