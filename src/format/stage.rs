use crate::config::model::{FilterKind, FilterStage, StageDescriptor};
use crate::foundation::core::display_scalar;

/// Human-readable summary of one stage: a header plus up to four detail lines.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct StageText {
    /// Upper-case header, e.g. `FILTER`.
    pub header: String,
    /// Detail lines in display order.
    pub details: Vec<String>,
}

/// Summarize a stage for display.
///
/// Pure function of its input. Unrecognized stages and filter kinds degrade to placeholder text
/// instead of failing.
pub fn format_stage(stage: &StageDescriptor) -> StageText {
    match stage {
        StageDescriptor::Input(d) | StageDescriptor::Output(d) => StageText {
            header: stage.type_name().to_uppercase(),
            details: vec![d.device.clone(), d.format.clone()],
        },
        StageDescriptor::Mixer(m) => StageText {
            header: "MIXER".to_string(),
            details: vec![pluralize(m.sources.len(), "source")],
        },
        StageDescriptor::Filter(f) => StageText {
            header: "FILTER".to_string(),
            details: filter_details(f),
        },
        StageDescriptor::Unknown(u) => StageText {
            header: "UNKNOWN".to_string(),
            details: u.type_name.iter().cloned().collect(),
        },
    }
}

fn filter_details(f: &FilterStage) -> Vec<String> {
    let Some(name) = &f.name else {
        return vec!["Unknown".to_string()];
    };

    let mut details = vec![name.clone()];
    let spec = &f.spec;
    match &spec.kind {
        FilterKind::Biquad => {
            if let Some(sub) = spec.param("type") {
                details.push(display_scalar(sub));
            }
            if let Some(freq) = spec.param("freq") {
                details.push(format!("{} Hz", display_scalar(freq)));
            }
            // Zero gain is a defined value and still shown.
            if let Some(gain) = spec.param("gain") {
                details.push(format!("{} dB", display_scalar(gain)));
            }
        }
        FilterKind::Gain => {
            if let Some(gain) = spec.param("gain") {
                details.push(format!("Gain: {} dB", display_scalar(gain)));
            }
        }
        FilterKind::Conv => details.push("Convolution".to_string()),
        FilterKind::Unspecified => {}
        FilterKind::Other(raw) => details.push(raw.clone()),
    }
    details
}

fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/format/stage.rs"]
mod tests;
