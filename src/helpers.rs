use std::time::Duration;

pub trait FormatSeconds {
    fn format_mm_ss(&self) -> String;
}

impl FormatSeconds for Duration {
    fn format_mm_ss(&self) -> String {
        let total = self.as_secs();
        let minutes = total / 60;
        let seconds = total % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mm_ss() {
        assert_eq!(Duration::from_secs(0).format_mm_ss(), "00:00");
        assert_eq!(Duration::from_secs(34).format_mm_ss(), "00:34");
        assert_eq!(Duration::from_secs(61).format_mm_ss(), "01:01");
        assert_eq!(Duration::from_secs(3600).format_mm_ss(), "60:00");
    }
}
