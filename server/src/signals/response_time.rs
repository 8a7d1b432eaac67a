pub const DEFAULT_RESPONSE_MINUTES: i32 = 120;

const MEETING_CAP_MINUTES: i32 = 60;
const BUSY_TASK_COUNT: usize = 3;
const BUSY_TASK_PENALTY: i32 = 60;

/// Predicted minutes until a reply is expected. Priority thresholds set the
/// base, a meeting proposal caps it, and a heavy task load pushes it out.
pub fn predict(priority: i32, has_meeting: bool, task_count: usize) -> i32 {
    let mut minutes = match priority {
        p if p >= 8 => 30,
        p if p >= 6 => 60,
        p if p <= 3 => 480,
        _ => DEFAULT_RESPONSE_MINUTES,
    };

    if has_meeting {
        minutes = minutes.min(MEETING_CAP_MINUTES);
    }
    if task_count > BUSY_TASK_COUNT {
        minutes += BUSY_TASK_PENALTY;
    }

    minutes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_thresholds() {
        assert_eq!(predict(9, false, 0), 30);
        assert_eq!(predict(8, false, 0), 30);
        assert_eq!(predict(6, false, 0), 60);
        assert_eq!(predict(5, false, 0), DEFAULT_RESPONSE_MINUTES);
        assert_eq!(predict(3, false, 0), 480);
    }

    #[test]
    fn test_meeting_caps_to_an_hour() {
        assert_eq!(predict(5, true, 0), 60);
        assert_eq!(predict(3, true, 0), 60);
        assert_eq!(predict(8, true, 0), 30);
    }

    #[test]
    fn test_many_tasks_push_out() {
        assert_eq!(predict(5, false, 4), 180);
        assert_eq!(predict(5, false, 3), DEFAULT_RESPONSE_MINUTES);
    }
}
