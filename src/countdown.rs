use crate::scheduler::Countdown;
use crate::settings::Language;

/// Formats remaining seconds as hours/minutes/seconds, dropping the hours
/// when they are zero.
pub fn format_remaining(remaining_secs: u64, language: Language) -> String {
    let hours = remaining_secs / 3600;
    let minutes = (remaining_secs % 3600) / 60;
    let seconds = remaining_secs % 60;

    match language {
        Language::English => {
            if hours > 0 {
                format!("{}h {}m {}s", hours, minutes, seconds)
            } else {
                format!("{}m {}s", minutes, seconds)
            }
        }
        Language::Arabic => {
            let (h, m, s) = (arabic_digits(hours), arabic_digits(minutes), arabic_digits(seconds));
            if hours > 0 {
                format!("{} ساعة {} دقيقة {} ثانية", h, m, s)
            } else {
                format!("{} دقيقة {} ثانية", m, s)
            }
        }
    }
}

pub fn status_line(countdown: Countdown, language: Language) -> String {
    match (countdown, language) {
        (Countdown::Remaining(secs), Language::English) => {
            format!("Active - Next reminder in {}", format_remaining(secs, language))
        }
        (Countdown::Remaining(secs), Language::Arabic) => {
            format!("نشط - التذكير التالي بعد: {}", format_remaining(secs, language))
        }
        (Countdown::Paused, Language::English) => {
            "Paused - Reminders are currently disabled".to_string()
        }
        (Countdown::Paused, Language::Arabic) => "متوقف - التذكير معطل حاليًا".to_string(),
    }
}

/// Label for the pause/resume control given the current run state.
pub fn toggle_label(running: bool, language: Language) -> &'static str {
    match (running, language) {
        (true, Language::English) => "Pause Reminders",
        (false, Language::English) => "Resume Reminders",
        (true, Language::Arabic) => "إيقاف التذكير",
        (false, Language::Arabic) => "استئناف التذكير",
    }
}

fn arabic_digits(value: u64) -> String {
    value
        .to_string()
        .chars()
        .map(|c| match c.to_digit(10) {
            // U+0660 ARABIC-INDIC DIGIT ZERO
            Some(d) => char::from_u32(0x0660 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_format() {
        assert_eq!(format_remaining(0, Language::English), "0m 0s");
        assert_eq!(format_remaining(59, Language::English), "0m 59s");
        assert_eq!(format_remaining(3661, Language::English), "1h 1m 1s");
        assert_eq!(format_remaining(1800, Language::English), "30m 0s");
        assert_eq!(format_remaining(36_000, Language::English), "10h 0m 0s");
    }

    #[test]
    fn arabic_format_uses_arabic_indic_digits() {
        assert_eq!(format_remaining(59, Language::Arabic), "٠ دقيقة ٥٩ ثانية");
        assert_eq!(format_remaining(3661, Language::Arabic), "١ ساعة ١ دقيقة ١ ثانية");
    }

    #[test]
    fn status_lines() {
        assert_eq!(
            status_line(Countdown::Remaining(61), Language::English),
            "Active - Next reminder in 1m 1s"
        );
        assert_eq!(
            status_line(Countdown::Paused, Language::English),
            "Paused - Reminders are currently disabled"
        );
        assert!(status_line(Countdown::Remaining(5), Language::Arabic).ends_with("٠ دقيقة ٥ ثانية"));
    }

    #[test]
    fn toggle_labels_follow_state() {
        assert_eq!(toggle_label(true, Language::English), "Pause Reminders");
        assert_eq!(toggle_label(false, Language::English), "Resume Reminders");
    }
}
