use anyhow::{Result, anyhow};
use log::{error, warn, info};
use std::fmt;
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::catalog::Catalog;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::providers::TranslationBackend;
use crate::translation::{CatalogOutcome, TranslationService};

// @module: Application controller for catalog translation workflows

/// Tally of what a multi-file run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationStatus {
    /// Catalogs created from a template
    pub created: usize,
    /// Catalogs that received new translations
    pub updated: usize,
    /// Catalogs that were already fully translated
    pub unchanged: usize,
    /// Catalogs that failed, partially or completely
    pub failed: usize,
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "created: {}, updated: {}, unchanged: {}, failed: {}",
            self.created, self.updated, self.unchanged, self.failed
        )
    }
}

/// Main application controller for catalog translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Translation service shared across files
    service: TranslationService,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranslationService::new(&config.translation)?;
        Ok(Self { config, service })
    }

    /// Create a controller around an existing backend, used by tests
    pub fn with_backend(config: Config, backend: Box<dyn TranslationBackend>) -> Result<Self> {
        let limits = config.translation.batch_limits()?;
        let service = TranslationService::with_backend(backend, limits, config.translation.format);
        Ok(Self { config, service })
    }

    /// The configuration this controller runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate a single catalog file
    ///
    /// The target language comes from `target`, or from the catalog's
    /// `Language` header field when absent. The catalog is written back when
    /// it changed and auto_save is on; a failure mid-run still saves whatever
    /// was recovered before the failing batch.
    pub async fn translate_file(&self, path: &Path, target: Option<&str>) -> Result<CatalogOutcome> {
        let mut catalog = Catalog::load(path)?;

        let target = match target {
            Some(code) => code.to_string(),
            None => catalog.metadata_value("Language")
                .filter(|code| !code.is_empty())
                .map(str::to_string)
                .ok_or_else(|| anyhow!(
                    "could not detect the target language for {}; the catalog has no Language header, please provide one",
                    path.display()
                ))?,
        };
        language_utils::validate_language_code(&target)?;
        let target = language_utils::normalize_language_code(&target)?;

        if let Some(declared) = catalog.metadata_value("Language").filter(|code| !code.is_empty()) {
            if !language_utils::language_codes_match(declared, &target) {
                warn!(
                    "{} declares language {} but is being translated to {}",
                    path.display(), declared, target
                );
            }
        }

        let pending = catalog.untranslated_indices().len();
        let outcome = self.service
            .translate_catalog(&mut catalog, &self.config.source_language, &target)
            .await;

        match outcome {
            Ok(outcome) => {
                if outcome.updated {
                    info!(
                        "{} translations for {} retrieved",
                        language_utils::get_language_name(&target)?,
                        path.display()
                    );
                    if self.config.auto_save {
                        self.save_catalog(&catalog)?;
                    }
                }
                Ok(outcome)
            }
            Err(error) => {
                // The completed batches were already merged into the catalog;
                // keep them on disk rather than paying for them again.
                let recovered = pending - catalog.untranslated_indices().len();
                if recovered > 0 && self.config.auto_save {
                    self.save_catalog(&catalog)?;
                }
                Err(error)
            }
        }
    }

    /// Translate every catalog of every supported locale under the locale dir
    ///
    /// Expects the conventional `{locale_dir}/{lang}/LC_MESSAGES/**/*.po`
    /// layout. Directories that are not language codes are reported and
    /// skipped; a failing catalog is counted and the run continues.
    pub async fn translate_locale_tree(&self) -> Result<TranslationStatus> {
        let locale_dir = Path::new(&self.config.locale_dir);
        if !FileManager::dir_exists(locale_dir) {
            return Err(anyhow!("Locale directory does not exist: {}", locale_dir.display()));
        }

        let all_locales = FileManager::list_subdirectories(locale_dir)?;
        let (locales, unsupported): (Vec<_>, Vec<_>) = all_locales.into_iter()
            .partition(|name| language_utils::is_supported_locale(name));

        info!("Attempting to translate the supported locales: {}", locales.join(", "));
        if !unsupported.is_empty() {
            warn!(
                "The following directories are not recognized language codes and will be skipped: {}",
                unsupported.join(", ")
            );
        }

        let mut work: Vec<(PathBuf, String)> = Vec::new();
        for locale in &locales {
            let messages_dir = locale_dir.join(locale).join("LC_MESSAGES");
            if !FileManager::dir_exists(&messages_dir) {
                continue;
            }
            for file in FileManager::find_files(&messages_dir, "po")? {
                work.push((file, locale.clone()));
            }
        }

        let mut status = TranslationStatus::default();
        let progress = self.file_progress_bar(work.len() as u64);
        for (file, locale) in work {
            progress.set_message(file.display().to_string());
            self.record(&mut status, self.translate_file(&file, Some(locale.as_str())).await, &file, false);
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!("Locale run finished ({})", status);
        Ok(status)
    }

    /// Translate every template under the pot dir into every target language
    ///
    /// For each `.pot` and each target, the matching catalog is derived at
    /// `{locale_dir}/{lang}/LC_MESSAGES/<relative dirs>/<stem>.po`, created
    /// from the template when missing, then translated.
    pub async fn translate_templates(&self, target_languages: &[String]) -> Result<TranslationStatus> {
        if target_languages.is_empty() {
            return Err(anyhow!("No target languages given; set target_languages or pass --target-languages"));
        }
        for target in target_languages {
            language_utils::validate_language_code(target)?;
        }

        let pot_dir = Path::new(&self.config.pot_dir);
        let templates = FileManager::find_files(pot_dir, "pot")?;
        if templates.is_empty() {
            warn!("No templates found under {}", pot_dir.display());
            return Ok(TranslationStatus::default());
        }

        let mut status = TranslationStatus::default();
        let progress = self.file_progress_bar((templates.len() * target_languages.len()) as u64);
        for template in &templates {
            for target in target_languages {
                progress.set_message(format!("{} -> {}", template.display(), target));
                match self.catalog_for_template(template, target, &mut status) {
                    Ok(po_path) => {
                        self.record(&mut status, self.translate_file(&po_path, Some(target.as_str())).await, &po_path, true);
                    }
                    Err(e) => {
                        error!("Skipping {} for {}: {}", template.display(), target, e);
                        status.failed += 1;
                    }
                }
                progress.inc(1);
            }
        }
        progress.finish_and_clear();

        info!("Template run finished ({})", status);
        Ok(status)
    }

    /// Derive the catalog path for a template and target language, creating
    /// the catalog from the template when it does not exist yet
    fn catalog_for_template(&self, template: &Path, target: &str, status: &mut TranslationStatus) -> Result<PathBuf> {
        let pot_dir = Path::new(&self.config.pot_dir);
        let relative = template.parent()
            .unwrap_or(Path::new(""))
            .strip_prefix(pot_dir)
            .unwrap_or(Path::new(""))
            .to_path_buf();

        let file_name = template.file_stem()
            .ok_or_else(|| anyhow!("Template has no file name: {}", template.display()))?;
        let mut po_name = PathBuf::from(file_name);
        po_name.set_extension("po");

        let po_path = Path::new(&self.config.locale_dir)
            .join(target)
            .join("LC_MESSAGES")
            .join(relative)
            .join(po_name);

        if !FileManager::file_exists(&po_path) {
            let catalog = Catalog::load(template)?;
            catalog.save_to(&po_path)?;
            status.created += 1;
            info!("Created: {}", po_path.display());
        }

        Ok(po_path)
    }

    /// Fold one file outcome into the running status
    fn record(&self, status: &mut TranslationStatus, outcome: Result<CatalogOutcome>, path: &Path, quiet: bool) {
        match outcome {
            Ok(CatalogOutcome { updated: true, translated }) => {
                status.updated += 1;
                if !quiet {
                    info!("Updated: {} ({} entries)", path.display(), translated);
                }
            }
            Ok(CatalogOutcome { updated: false, .. }) => {
                status.unchanged += 1;
                info!("Not changed: {}", path.display());
            }
            Err(e) => {
                status.failed += 1;
                error!("Failed: {}: {:#}", path.display(), e);
            }
        }
    }

    /// Save a catalog and, when configured, its compiled form
    fn save_catalog(&self, catalog: &Catalog) -> Result<()> {
        catalog.save()?;
        info!("Saved: {}", catalog.path.display());
        if self.config.compile {
            let mo_path = catalog.path.with_extension("mo");
            catalog.save_mo(&mo_path)?;
            info!("Compiled: {}", mo_path.display());
        }
        Ok(())
    }

    fn file_progress_bar(&self, total: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(total);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result);
        progress_bar
    }
}
