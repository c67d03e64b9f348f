use super::{placeholder_marker, substitute, TemplateError};
use crate::defaults::SCRAPE_INTERVAL_PLACEHOLDER;
use crate::fs::file_reader::FileReader;
use crate::fs::file_writer::FileWriter;
use std::path::Path;
use tracing::{debug, warn};

/// Copies `templates` from `templates_dir` into `work_dir`, filling the
/// scrape interval marker with `scrape_interval`. Templates are rewritten
/// from the staged copies only, so the pristine ones are never modified.
///
/// Returns the templates that were staged; failures are logged and skipped.
pub fn stage_templates<'a, F, I>(
    fs: &F,
    templates_dir: &Path,
    work_dir: &Path,
    templates: I,
    scrape_interval: &str,
) -> Vec<&'a str>
where
    F: FileReader + FileWriter,
    I: IntoIterator<Item = &'a str>,
{
    templates
        .into_iter()
        .filter(|template| {
            match stage_template(fs, templates_dir, work_dir, template, scrape_interval) {
                Ok(()) => true,
                Err(err) => {
                    warn!(template, "unable to stage template: {err}");
                    false
                }
            }
        })
        .collect()
}

fn stage_template<F: FileReader + FileWriter>(
    fs: &F,
    templates_dir: &Path,
    work_dir: &Path,
    template: &str,
    scrape_interval: &str,
) -> Result<(), TemplateError> {
    let content = fs.read(&templates_dir.join(template))?;
    let staged = substitute(&content, &[(SCRAPE_INTERVAL_PLACEHOLDER, scrape_interval)]);
    fs.write(&work_dir.join(template), staged)?;
    debug!(
        template,
        marker = %placeholder_marker(SCRAPE_INTERVAL_PLACEHOLDER),
        scrape_interval,
        "template staged"
    );
    Ok(())
}
