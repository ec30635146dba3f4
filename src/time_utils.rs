use crate::domain::market_data::{TimeFrame, TradeDate};

/// Granularity of a time-axis label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLabelStyle {
    /// `YYYY/MM/DD`
    Full,
    /// `MM/DD`
    MonthDay,
    /// `YYYY/MM`
    YearMonth,
}

impl DateLabelStyle {
    /// Style for a visible span: the full date for a single bar, month labels
    /// once it crosses a year boundary or the bars are weekly/monthly.
    pub fn for_span(first: &TradeDate, last: &TradeDate, time_frame: Option<TimeFrame>) -> Self {
        if matches!(time_frame, Some(TimeFrame::Weekly | TimeFrame::Monthly)) {
            return DateLabelStyle::YearMonth;
        }
        if first == last {
            return DateLabelStyle::Full;
        }
        match (first.parts(), last.parts()) {
            (Some((y1, _, _)), Some((y2, _, _))) if y1 != y2 => DateLabelStyle::YearMonth,
            _ => DateLabelStyle::MonthDay,
        }
    }
}

/// Format a trade date for display. Unparseable dates are shown verbatim.
pub fn format_date_label(date: &TradeDate, style: DateLabelStyle) -> String {
    let Some((year, month, day)) = date.parts() else {
        return date.as_str().to_string();
    };
    match style {
        DateLabelStyle::Full => format!("{year:04}/{month:02}/{day:02}"),
        DateLabelStyle::MonthDay => format!("{month:02}/{day:02}"),
        DateLabelStyle::YearMonth => format!("{year:04}/{month:02}"),
    }
}

/// Price axis label with two decimals
pub fn format_price(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_style() {
        let date = TradeDate::from("2024-01-05");
        assert_eq!(format_date_label(&date, DateLabelStyle::Full), "2024/01/05");
        assert_eq!(format_date_label(&date, DateLabelStyle::MonthDay), "01/05");
        assert_eq!(format_date_label(&date, DateLabelStyle::YearMonth), "2024/01");
    }

    #[test]
    fn bad_dates_pass_through() {
        let date = TradeDate::from("yesterday");
        assert_eq!(format_date_label(&date, DateLabelStyle::Full), "yesterday");
    }

    #[test]
    fn span_picks_style() {
        let jan = TradeDate::from("2024-01-05");
        let mar = TradeDate::from("2024-03-01");
        let next_year = TradeDate::from("2025-01-02");
        assert_eq!(DateLabelStyle::for_span(&jan, &jan, None), DateLabelStyle::Full);
        assert_eq!(DateLabelStyle::for_span(&jan, &mar, None), DateLabelStyle::MonthDay);
        assert_eq!(DateLabelStyle::for_span(&jan, &next_year, None), DateLabelStyle::YearMonth);
        assert_eq!(DateLabelStyle::for_span(&jan, &mar, Some(TimeFrame::Weekly)), DateLabelStyle::YearMonth);
    }
}
