use std::io::{self, Write};

use load_shape_core::ShapeKind;
use load_shape_engine::ProfilePoint;
use load_shape_environment::ShapeDescriptor;
use serde::Serialize;

/// Result of a preview run.
#[derive(Debug, Serialize)]
pub(crate) struct PreviewReport {
    pub(crate) shape: ShapeKind,
    pub(crate) noise_percent: f64,
    pub(crate) seed: Option<u64>,
    pub(crate) points: Vec<ProfilePoint>,
}

pub(crate) fn write_preview_table<W: Write>(out: &mut W, report: &PreviewReport) -> io::Result<()> {
    writeln!(out, "shape: {}  noise: {}%", report.shape, report.noise_percent)?;
    if let Some(seed) = report.seed {
        writeln!(out, "seed: {seed}")?;
    }
    writeln!(out, "{:>10}  {:>8}  {:>10}", "run_time", "users", "spawn_rate")?;
    for point in &report.points {
        writeln!(
            out,
            "{:>10.1}  {:>8}  {:>10.2}",
            point.run_time.as_secs(),
            point.target.users(),
            point.target.spawn_rate()
        )?;
    }
    write!(out, "{} ticks", report.points.len())
}

pub(crate) fn write_catalog_table<W: Write>(
    out: &mut W,
    shapes: &[ShapeDescriptor],
) -> io::Result<()> {
    for (index, shape) in shapes.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{} ({}): {}", shape.id.selector(), shape.name, shape.description)?;
        for parameter in &shape.parameters {
            writeln!(
                out,
                "  {:<28} default {:<10} {}",
                parameter.name,
                parameter.default.to_string(),
                parameter.label
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{write_catalog_table, write_preview_table, PreviewReport};
    use load_shape_core::{LoadTarget, RunTime, ShapeKind};
    use load_shape_engine::ProfilePoint;
    use load_shape_environment::describe;

    #[test]
    fn preview_table_lists_every_point() {
        let report = PreviewReport {
            shape: ShapeKind::Step,
            noise_percent: 0.0,
            seed: Some(3),
            points: vec![
                ProfilePoint {
                    run_time: RunTime::from_secs(0.0),
                    target: LoadTarget::new(10, 10.0),
                },
                ProfilePoint {
                    run_time: RunTime::from_secs(30.0),
                    target: LoadTarget::new(20, 10.0),
                },
            ],
        };
        let mut buffer = Vec::new();
        write_preview_table(&mut buffer, &report).expect("write to memory");
        let text = String::from_utf8(buffer).expect("utf-8 output");

        assert!(text.starts_with("shape: Step  noise: 0%\nseed: 3\n"));
        assert!(text.contains("      30.0        20       10.00"));
        assert!(text.ends_with("2 ticks"));
    }

    #[test]
    fn catalog_table_names_every_parameter() {
        let shape = describe(ShapeKind::Spike);
        let mut buffer = Vec::new();
        write_catalog_table(&mut buffer, std::slice::from_ref(&shape)).expect("write to memory");
        let text = String::from_utf8(buffer).expect("utf-8 output");

        assert!(text.starts_with("spike (Spike Testing)"));
        for parameter in &shape.parameters {
            assert!(text.contains(parameter.name), "{} missing", parameter.name);
        }
    }
}
