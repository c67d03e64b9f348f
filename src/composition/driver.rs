use super::custom::{apply_label_limits, load_custom_config, merge_with_custom, resolve_global_interval};
use super::session::Session;
use super::{merge_default_documents, CompositionOutcome};
use crate::config::ComposerConfig;
use crate::environment::PodEnvironment;
use crate::fs::file_reader::FileReader;
use crate::fs::file_writer::FileWriter;
use crate::registry::JobRegistry;
use crate::settings::env_file::EnvFile;
use crate::settings::hash_store::HashFile;
use crate::settings::{IngestedSettings, SettingsIngestor};
use crate::template::rewriter::TemplateRewriter;
use crate::template::staging::stage_templates;
use crate::yaml::Node;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Runs the composition pipeline for the plane of a [`JobRegistry`].
///
/// Stages run once and in order. A failing stage degrades what it produces
/// and never stops the following ones.
pub struct CompositionDriver<'a, F> {
    fs: &'a F,
    config: &'a ComposerConfig,
}

impl<'a, F: FileReader + FileWriter> CompositionDriver<'a, F> {
    pub fn new(fs: &'a F, config: &'a ComposerConfig) -> Self {
        Self { fs, config }
    }

    /// Composes the plane selected in the configuration.
    pub fn run(&self, env: PodEnvironment) -> CompositionOutcome {
        self.run_with_registry(JobRegistry::for_plane(self.config.plane), env)
    }

    pub fn run_with_registry(&self, registry: JobRegistry, env: PodEnvironment) -> CompositionOutcome {
        let plane = registry.plane();
        info!(%plane, "starting prometheus config composition");
        let mut written = Vec::new();

        let mut custom = self
            .config
            .custom_config_path
            .as_deref()
            .and_then(|path| load_custom_config(self.fs, path));
        let scrape_interval = resolve_global_interval(custom.as_mut());
        info!(%scrape_interval, "scrape interval for default targets resolved");

        let templates = registry.template_files();
        let staged: BTreeSet<&str> = stage_templates(
            self.fs,
            &self.config.templates_dir,
            &self.config.work_dir,
            templates.iter().copied(),
            &scrape_interval,
        )
        .into_iter()
        .collect();
        debug!(staged = staged.len(), "templates staged");

        let mut settings = SettingsIngestor::new(
            self.fs,
            &self.config.settings_dir,
            &self.config.v2_settings_files,
        )
        .ingest(&registry, &env);
        self.write_env_files(&settings, &mut written);
        settings.regex_hash =
            self.persist_and_reload(&self.config.outputs.regex_hash, &settings.regex_hash, &mut written);
        settings.interval_hash = self.persist_and_reload(
            &self.config.outputs.interval_hash,
            &settings.interval_hash,
            &mut written,
        );

        let session = Session::new(registry, env, settings);
        let no_defaults_enabled = session.settings.no_defaults_enabled;
        let mut selected_jobs = Vec::new();
        let mut skipped_jobs = Vec::new();
        let defaults = if no_defaults_enabled {
            info!(%plane, "no default scrape targets enabled");
            None
        } else {
            self.compose_defaults(&session, &staged, &mut selected_jobs, &mut skipped_jobs)
        };
        if let Some(defaults) = &defaults {
            self.write_document(&self.config.outputs.defaults_merged, defaults, &mut written);
        }

        let merged = custom.map(|mut custom| {
            apply_label_limits(&mut custom);
            let merged = merge_with_custom(defaults.as_ref(), custom);
            self.write_document(&self.config.outputs.prom_merged, &merged, &mut written);
            merged
        });

        info!(
            %plane,
            selected = selected_jobs.len(),
            skipped = skipped_jobs.len(),
            custom = merged.is_some(),
            "prometheus config composition done"
        );

        CompositionOutcome {
            plane,
            selected_jobs,
            skipped_jobs,
            no_defaults_enabled,
            defaults,
            merged,
            written,
        }
    }

    /// Rewrites the staged template of every applicable job and merges the
    /// results. Empty results produce no document.
    fn compose_defaults(
        &self,
        session: &Session,
        staged: &BTreeSet<&str>,
        selected_jobs: &mut Vec<String>,
        skipped_jobs: &mut Vec<String>,
    ) -> Option<Node> {
        let rewriter = TemplateRewriter::new(self.fs);
        let mut documents = Vec::new();

        for job in session.selected_jobs() {
            let name = job.definition.name;
            let template = job.template();
            if !staged.contains(template) {
                warn!(job = name, template, "template was not staged, job skipped");
                skipped_jobs.push(name.to_string());
                continue;
            }
            let path = self.config.work_dir.join(template);
            match rewriter.rewrite(&path, &session.rewrite_for(&job)) {
                Ok(document) => {
                    debug!(job = name, template, "default scrape job composed");
                    selected_jobs.push(name.to_string());
                    documents.push(document);
                }
                Err(err) => {
                    warn!(job = name, template, "unable to compose default scrape job: {err}");
                    skipped_jobs.push(name.to_string());
                }
            }
        }

        info!(count = documents.len(), "merging default scrape configs");
        merge_default_documents(documents).filter(|defaults| !defaults.is_empty())
    }

    fn write_env_files(&self, settings: &IngestedSettings, written: &mut Vec<PathBuf>) {
        let outputs = &self.config.outputs;
        let env_files: [(&Path, EnvFile); 6] = [
            (outputs.default_scrape_settings_env.as_path(), settings.enablement_env_file()),
            (outputs.collector_settings_env.as_path(), settings.collector.to_env_file()),
            (outputs.debug_mode_env.as_path(), settings.debug_mode_env_file()),
            (outputs.pod_annotation_env.as_path(), settings.pod_annotation_env_file()),
            (outputs.otel_metrics_env.as_path(), settings.otel_metrics_env_file()),
            (outputs.versions_env.as_path(), settings.versions.to_env_file()),
        ];
        for (path, env_file) in env_files {
            self.write_artifact(path, env_file.render(), written);
        }
    }

    /// Persists `hash` and reads it back, so the rewrite only sees what was
    /// stored. An unreadable hash is empty.
    fn persist_and_reload(
        &self,
        path: &Path,
        hash: &BTreeMap<String, String>,
        written: &mut Vec<PathBuf>,
    ) -> BTreeMap<String, String> {
        let hash_file = HashFile::new(path);
        match hash_file.persist(self.fs, hash) {
            Ok(()) => written.push(path.to_path_buf()),
            Err(err) => warn!(path = %path.display(), "unable to persist hash: {err}"),
        }
        hash_file.load(self.fs).unwrap_or_else(|err| {
            warn!(path = %path.display(), "unable to load hash, using an empty one: {err}");
            BTreeMap::new()
        })
    }

    fn write_document(&self, path: &Path, document: &Node, written: &mut Vec<PathBuf>) {
        match document.to_yaml_string() {
            Ok(content) => self.write_artifact(path, content, written),
            Err(err) => warn!(path = %path.display(), "unable to serialize document: {err}"),
        }
    }

    fn write_artifact(&self, path: &Path, content: String, written: &mut Vec<PathBuf>) {
        match self.fs.write(path, content) {
            Ok(()) => {
                debug!(path = %path.display(), "artifact written");
                written.push(path.to_path_buf());
            }
            Err(err) => warn!(path = %path.display(), "unable to write artifact: {err}"),
        }
    }
}
