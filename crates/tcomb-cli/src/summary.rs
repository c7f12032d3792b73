use std::time::Duration;

use console::Style;
use tcomb_core::pipeline::config::PipelineConfig;
use tcomb_core::pipeline::PipelineSummary;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_run_header(config: &PipelineConfig) {
    let s = Styles::new();
    let filter = &config.filter;

    println!();
    println!("  {}", s.title.apply_to("Temporal Comb Filter"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(20)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Field order"),
        s.method.apply_to(config.field_order)
    );
    println!();

    println!("  {}", s.header.apply_to("Filter"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Planes"),
        s.method.apply_to(filter.mode)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Fine"),
        s.value.apply_to(format!(
            "luma {} / chroma {}",
            filter.fine_threshold_luma, filter.fine_threshold_chroma
        ))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Output"),
        s.value.apply_to(format!(
            "luma {} / chroma {}",
            filter.output_threshold_luma, filter.output_threshold_chroma
        ))
    );
    if filter.scene_threshold < 0.0 {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Scene cut"),
            s.disabled.apply_to("disabled")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Scene cut"),
            s.value.apply_to(format!("{}%", filter.scene_threshold))
        );
    }
    if filter.map {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Output"),
            s.disabled.apply_to("correction map")
        );
    }
    println!();
}

pub fn print_run_summary(summary: &PipelineSummary, config: &PipelineConfig, elapsed: Duration) {
    let s = Styles::new();
    let format = &summary.format;

    println!();
    println!("  {}", s.header.apply_to("Result"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Format"),
        s.value.apply_to(format!("{}x{} {}", format.width, format.height, format.sampling))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(summary.frames_written)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Fields"),
        s.value.apply_to(summary.fields_processed)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Scene cuts"),
        s.value.apply_to(summary.scene_changes)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Corrected"),
        s.value.apply_to(format!("{} px", summary.corrected_pixels))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Time"),
        s.value.apply_to(format!("{:.2}s", elapsed.as_secs_f64()))
    );
    println!();
    println!(
        "  Output saved to {}",
        s.path.apply_to(config.output.display())
    );
}
