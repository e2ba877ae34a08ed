//! Batch (`DSSBatch.vNN`) and run script (`RunNN.bat`) writers

use super::{RenderedFile, WriterContext, push_line};
use crate::app::services::fixed_width::WarningLog;
use crate::app::models::Experiment;
use crate::app::services::grouping::{ExperimentGroup, group_key};
use crate::config::DssatVersion;
use crate::constants::UNKNOWN_CROP_NAME;
use std::collections::HashMap;
use tracing::debug;

/// Render the batch file listing every treatment of `experiments` for `version`
///
/// Each treatment becomes one `@FILEX` row pointing at the experiment file of
/// its group in `groups`, in dataset order and numbered across the whole
/// batch. The crop is taken from the first experiment. Returns `None` when
/// there are no experiments.
pub fn render_batch_file(
    experiments: &[Experiment],
    groups: &[ExperimentGroup],
    version: DssatVersion,
    ctx: &WriterContext,
) -> Option<RenderedFile> {
    let file_names: HashMap<&str, String> = groups
        .iter()
        .map(|group| (group.key.as_str(), group.file_name('X')))
        .collect();
    let rows: Vec<&str> = experiments
        .iter()
        .filter_map(|experiment| file_names.get(group_key(experiment.exname()).as_str()))
        .map(String::as_str)
        .collect();
    let first = experiments.first()?;
    if rows.is_empty() {
        return None;
    }

    let mut warnings = WarningLog::new();
    let crid = first.crop_id().unwrap_or_default();
    let crop = match ctx.crops.crop_name(crid) {
        Some(name) => name,
        None => {
            warnings.undefined_crop(crid);
            UNKNOWN_CROP_NAME
        }
    };

    let mut data = String::new();
    push_line(&mut data, &format!("$BATCH({})", crop.to_uppercase()));
    push_line(&mut data, "!");
    push_line(
        &mut data,
        &format!(
            "! Command Line : C:\\DSSAT{v}\\DSCSM0{v}.EXE B DSSBatch.v{v}",
            v = version
        ),
    );
    push_line(&mut data, &format!("! Crop         : {}", crop));
    push_line(&mut data, &format!("! Experiment   : {}", rows[0]));
    push_line(&mut data, &format!("! ExpNo        : {}", rows.len()));
    push_line(
        &mut data,
        &format!(
            "! Debug        : C:\\DSSAT{v}\\DSCSM0{v}.EXE \" B DSSBatch.v{v}\"",
            v = version
        ),
    );
    push_line(&mut data, "!");
    push_line(
        &mut data,
        &format!(
            "@FILEX{}TRTNO     RP     SQ     OP     CO",
            " ".repeat(88)
        ),
    );
    for (idx, file_name) in rows.iter().enumerate() {
        push_line(
            &mut data,
            &format!(
                "{:<92} {:>6} {:>6} {:>6} {:>6} {:>6}",
                file_name,
                idx + 1,
                1,
                1,
                1,
                0
            ),
        );
    }

    debug!("Rendered batch file for DSSAT {} with {} rows", version, rows.len());

    let mut content = warnings.render();
    content.push_str(&data);
    Some(RenderedFile::new(format!("DSSBatch.v{}", version), content))
}

/// Render the Windows script launching the batch for `version`
pub fn render_run_file(version: DssatVersion) -> RenderedFile {
    let mut content = String::new();
    push_line(
        &mut content,
        &format!("C:\\dssat{v}\\dscsm0{v} b dssbatch.v{v}", v = version),
    );
    push_line(&mut content, "@echo off");
    push_line(&mut content, "pause");
    push_line(&mut content, "exit");
    RenderedFile::new(format!("Run{}.bat", version), content)
}
