use plotters::prelude::*;
use std::path::Path;
use tracing::info;

/// log10 of every cost plus a y range that always has a nonzero span.
fn log_cost_axis(costs: &[f64]) -> (Vec<f64>, f64, f64) {
    // log10 is undefined at zero
    let log_costs: Vec<f64> = costs
        .iter()
        .map(|&c| if c <= 0.0 { 1e-10 } else { c })
        .map(f64::log10)
        .collect();

    let y_min = log_costs.iter().cloned().fold(f64::INFINITY, f64::min).floor();
    let y_max = log_costs.iter().cloned().fold(f64::NEG_INFINITY, f64::max).ceil();
    let (y_min, y_max) = if y_min < y_max {
        (y_min, y_max)
    } else if y_min.is_finite() {
        (y_min - 1.0, y_min + 1.0)
    } else {
        (-1.0, 1.0)
    };
    (log_costs, y_min, y_max)
}

/// Draws the per-epoch reported cost on a log10 axis and saves it as a PNG.
pub fn plot_errors_over_epochs<P: AsRef<Path>>(
    costs: &[f64],
    filename: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let filename = filename.as_ref();
    let root = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let epochs = costs.len().max(1);
    let (log_costs, y_min, y_max) = log_cost_axis(costs);

    let mut chart = ChartBuilder::on(&root)
        .caption("Reported cost over epochs (log scale)", ("sans-serif", 30).into_font())
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(1..epochs + 1, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Epoch")
        .y_desc("Cost (log scale)")
        .y_label_formatter(&|y| format!("1e{:.0}", y))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            log_costs.iter().enumerate().map(|(epoch, &c)| (epoch + 1, c)),
            &BLUE,
        ))?
        .label("Last example cost")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    info!("Cost plot saved as '{}'", filename.display());

    Ok(())
}
