use kline_chart_wasm::domain::chart::LogicalRange;
use quickcheck_macros::quickcheck;

#[test]
fn last_takes_the_tail() {
    assert_eq!(LogicalRange::last(300, 60), Some(LogicalRange::new(240, 299)));
    assert_eq!(LogicalRange::last(40, 60), Some(LogicalRange::new(0, 39)));
    assert_eq!(LogicalRange::last(0, 60), None);
    assert_eq!(LogicalRange::fit(0), None);
    assert_eq!(LogicalRange::fit(1), Some(LogicalRange::new(0, 0)));
}

#[test]
fn pan_stops_at_both_ends() {
    let range = LogicalRange::new(100, 159);
    assert_eq!(range.pan(-30, 300), LogicalRange::new(70, 129));
    assert_eq!(range.pan(-1_000, 300), LogicalRange::new(0, 59));
    assert_eq!(range.pan(1_000, 300), LogicalRange::new(240, 299));
}

#[test]
fn zoom_out_never_exceeds_the_data() {
    let range = LogicalRange::new(240, 299);
    assert_eq!(range.zoom(0.1, 0.5, 300, 5), LogicalRange::new(0, 299));
}

#[test]
fn zoom_in_stops_at_minimum_width() {
    let range = LogicalRange::new(0, 59);
    let zoomed = range.zoom(100.0, 0.0, 300, 5);
    assert_eq!(zoomed, LogicalRange::new(0, 4));
}

#[test]
fn invalid_factor_keeps_the_range() {
    let range = LogicalRange::new(10, 20);
    assert_eq!(range.zoom(f64::NAN, 0.5, 100, 5), range);
    assert_eq!(range.zoom(0.0, 0.5, 100, 5), range);
    assert_eq!(range.zoom(-2.0, 0.5, 100, 5), range);
}

#[quickcheck]
fn pan_keeps_width_and_stays_in_bounds(from: u16, width: u8, delta: i16, extra: u16) -> bool {
    let width = width as usize + 1;
    let count = from as usize + width + extra as usize;
    let range = LogicalRange::new(from as usize, from as usize + width - 1);
    let panned = range.pan(delta as isize, count);
    panned.len() == width && panned.to < count
}

#[quickcheck]
fn zoom_stays_in_bounds(from: u8, width: u8, extra: u8, factor: u8, anchor: u8) -> bool {
    let width = width as usize + 1;
    let count = from as usize + width + extra as usize;
    let range = LogicalRange::new(from as usize, from as usize + width - 1);
    let factor = (factor as f64 + 1.0) / 16.0;
    let anchor = anchor as f64 / 255.0;
    let zoomed = range.zoom(factor, anchor, count, 5);
    zoomed.to < count && zoomed.len() >= 5.min(count) && zoomed.len() <= count
}
