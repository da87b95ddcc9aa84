use std::path::Path;

use console::Style;
use tdview_core::index::FrameLocator;
use tdview_core::io::experiment::ExperimentParams;
use tdview_core::io::tdms::PropertyValue;
use tdview_core::pipeline::RenderedFrame;
use tdview_core::range::GlobalRange;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    warn: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            warn: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_session_summary(
    params: &ExperimentParams,
    tdms: &Path,
    locator: &FrameLocator,
    range: &GlobalRange,
) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to(&params.name));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(params.name.chars().count().max(8)))
    );
    println!();

    println!("  {:<14}{}", s.label.apply_to("TDMS"), s.path.apply_to(tdms.display()));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Dimensions"),
        s.value.apply_to(format!("{}x{}", params.pixels_x, params.pixels_y))
    );
    println!();

    println!("  {}", s.header.apply_to("Stack"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Time steps"),
        s.value.apply_to(locator.time_steps)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Z stride"),
        s.value.apply_to(locator.z_stride)
    );
    println!();

    println!("  {}", s.header.apply_to("Global range"));
    println!("    {:<12}{}", s.label.apply_to("Min"), s.value.apply_to(range.min));
    println!("    {:<12}{}", s.label.apply_to("Max"), s.value.apply_to(range.max));
    if range.is_degenerate() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Note"),
            s.warn.apply_to("constant data, frames render black")
        );
    }
    println!();
}

pub fn print_frame_labels(frame: &RenderedFrame) {
    let s = Styles::new();
    let or_na = |v: Option<f64>, fmt: fn(f64) -> String| v.map(fmt).unwrap_or_else(|| "n/a".into());

    println!("  {}", s.header.apply_to("Frame"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Index"),
        s.value.apply_to(format!("{} (t={}, z={})", frame.index, frame.time, frame.z))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Timestamp"),
        s.value.apply_to(or_na(frame.timestamp_s, |t| format!("{t:.2} s")))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Piezo"),
        s.value.apply_to(or_na(frame.piezo_um, |p| format!("{p} um")))
    );
}

pub fn print_properties(title: &str, properties: &[(String, PropertyValue)]) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to(title));
    if properties.is_empty() {
        println!("    {}", s.warn.apply_to("none"));
    }
    for (name, value) in properties {
        println!("    {:<24}{}", s.label.apply_to(name), s.value.apply_to(value));
    }
}
