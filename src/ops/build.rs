//! Implementation of `mosaic build`.
//!
//! Resolves the backend, lints dependency categories, selects sources,
//! skips up-to-date artifacts, assembles the rest and links. Runner
//! backends stop after selection: a successful runner build only means
//! there is something to run.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::builder::backend::{Backend, Compiler};
use crate::builder::events::BuildEvent;
use crate::builder::lint::{lint, LintFinding};
use crate::builder::progress::ProgressReporter;
use crate::builder::registry::{BackendKind, BackendRegistry};
use crate::builder::scheduler::BuildScheduler;
use crate::builder::selector::SourceSelector;
use crate::builder::staleness::StalenessOracle;
use crate::core::config::{BuildOverrides, ProjectConfig};
use crate::core::project::Project;
use crate::error::BuildError;
use crate::ops::clean::clean;

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Remove previous artifacts first
    pub clean: bool,

    /// Per-invocation configuration changes. A test entry here makes this a
    /// test build.
    pub overrides: BuildOverrides,
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Resolved backend name
    pub backend: String,
    pub kind: BackendKind,
    /// Selected sources, in selection order
    pub sources: Vec<PathBuf>,
    /// Project-relative artifacts in link order
    pub artifacts: Vec<PathBuf>,
    /// Linked output, if linking ran
    pub output: Option<PathBuf>,
    /// Sources assembled by this build
    pub compiled: usize,
    /// Sources whose artifact was reused
    pub skipped: usize,
    pub warnings: Vec<LintFinding>,
    pub duration: Duration,
}

/// Build a project.
pub fn build(
    registry: &BackendRegistry,
    project: &Project,
    opts: &BuildOptions,
    reporter: &dyn ProgressReporter,
) -> Result<BuildOutcome, BuildError> {
    let start = Instant::now();
    let result = build_inner(registry, project, opts, reporter, start);

    let event = match &result {
        Ok(outcome) => BuildEvent::BuildFinished {
            success: true,
            duration_ms: outcome.duration.as_millis() as u64,
            artifacts: outcome.artifacts.clone(),
            output: outcome.output.clone(),
            errors: Vec::new(),
        },
        Err(e) => BuildEvent::BuildFinished {
            success: false,
            duration_ms: start.elapsed().as_millis() as u64,
            artifacts: Vec::new(),
            output: None,
            errors: error_messages(e),
        },
    };
    reporter.event(&event);

    result
}

fn build_inner(
    registry: &BackendRegistry,
    project: &Project,
    opts: &BuildOptions,
    reporter: &dyn ProgressReporter,
    start: Instant,
) -> Result<BuildOutcome, BuildError> {
    let root = project.root();
    let config = project.config().with_overrides(&opts.overrides);

    if opts.clean {
        clean(root, &config)?;
    }

    let backend = registry.resolve(&config.build.backend)?;
    let descriptor = backend.descriptor();
    let jobs = config.build.jobs();

    tracing::info!(
        "building {} with `{}` ({}, {} job(s))",
        config.name(),
        descriptor.name(),
        config.build.mode,
        jobs
    );
    reporter.event(&BuildEvent::BuildStarted {
        project: config.name().to_string(),
        backend: descriptor.name().to_string(),
        mode: config.build.mode.as_str().to_string(),
        jobs,
    });

    let warnings = lint(&config, &descriptor);
    for finding in &warnings {
        tracing::warn!("{}", finding);
        reporter.event(&BuildEvent::LintWarning {
            dependency: finding.dependency.clone(),
            message: finding.to_string(),
        });
    }

    let test_entry = opts.overrides.test_entry.as_deref();
    let sources = SourceSelector::new(root, &config, descriptor.extensions()).select(test_entry);
    if sources.is_empty() {
        return Err(BuildError::NoSourcesFound {
            backend: descriptor.name().to_string(),
            extensions: descriptor.extensions().to_vec(),
        });
    }

    let compiler = match backend {
        Backend::Compiler(compiler) => compiler,
        Backend::Runner(_) => {
            tracing::info!(
                "{} source(s) ready for runner `{}`",
                sources.len(),
                descriptor.name()
            );
            return Ok(BuildOutcome {
                backend: descriptor.name().to_string(),
                kind: BackendKind::Runner,
                sources,
                artifacts: Vec::new(),
                output: None,
                compiled: 0,
                skipped: 0,
                warnings,
                duration: start.elapsed(),
            });
        }
    };

    let oracle = StalenessOracle::new(root, compiler.artifact_naming(), &config.build);
    let partition = oracle.partition(oracle.tasks(&sources)?);
    let compiled = partition.stale.len();
    let skipped = partition.fresh.len();
    if skipped > 0 {
        tracing::info!("{} of {} source(s) up to date", skipped, sources.len());
    }

    let scheduler = BuildScheduler::new(compiler.as_ref(), root, &config, reporter);
    let mut indexed = scheduler.run(&partition.stale, jobs)?;
    indexed.extend(
        partition
            .fresh
            .iter()
            .map(|task| (task.index, task.artifact.clone())),
    );
    indexed.sort_by_key(|(index, _)| *index);
    let artifacts: Vec<PathBuf> = indexed.into_iter().map(|(_, artifact)| artifact).collect();

    let output = if config.build.link && !artifacts.is_empty() {
        let output = config.output_path(compiler.output_extension());
        link(compiler.as_ref(), root, &artifacts, &output, &config)?;
        Some(output)
    } else {
        None
    };

    Ok(BuildOutcome {
        backend: descriptor.name().to_string(),
        kind: BackendKind::Compiler,
        sources,
        artifacts,
        output,
        compiled,
        skipped,
        warnings,
        duration: start.elapsed(),
    })
}

fn link(
    compiler: &dyn Compiler,
    root: &Path,
    artifacts: &[PathBuf],
    output: &Path,
    config: &ProjectConfig,
) -> Result<(), BuildError> {
    tracing::info!("linking {} artifact(s) into {}", artifacts.len(), output.display());
    compiler
        .link(root, artifacts, output, config)
        .map_err(|e| BuildError::Link {
            output: output.to_path_buf(),
            message: e.to_string(),
        })
}

/// Check dependency categories without building.
pub fn lint_project(
    registry: &BackendRegistry,
    project: &Project,
    overrides: &BuildOverrides,
) -> Result<Vec<LintFinding>, BuildError> {
    let config = project.config().with_overrides(overrides);
    let backend = registry.resolve(&config.build.backend)?;
    Ok(lint(&config, &backend.descriptor()))
}

fn error_messages(error: &BuildError) -> Vec<String> {
    let assemble = error.assemble_errors();
    if assemble.is_empty() {
        vec![error.to_string()]
    } else {
        assemble.iter().map(|e| e.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::backend::ArtifactNaming;
    use crate::builder::progress::SilentReporter;
    use crate::test_support::{FakeCompiler, FakeRunner, ProjectFixture, RecordingReporter};
    use std::fs;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn registry_with(compiler: &FakeCompiler) -> BackendRegistry {
        let mut registry = BackendRegistry::empty();
        let compiler = compiler.clone();
        registry.register_compiler(move || Box::new(compiler.clone()));
        registry
    }

    fn fake() -> FakeCompiler {
        FakeCompiler::new("fake", &[".c"])
    }

    fn wildcard_project(root: &Path, files: &[&str]) -> Project {
        let mut fixture = ProjectFixture::new("demo").configure(|c| {
            c.build.backend = "fake".to_string();
            c.build.wildcard = true;
        });
        for file in files {
            fixture = fixture.with_file(*file, "int x;\n");
        }
        fixture.write_to(root).unwrap()
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn test_single_main_builds_and_links() {
        let tmp = TempDir::new().unwrap();
        let project = ProjectFixture::new("demo")
            .configure(|c| c.build.backend = "FAKE".to_string())
            .with_file("src/main.c", "int main(void) { return 0; }\n")
            .write_to(tmp.path())
            .unwrap();
        let compiler = fake();

        let outcome = build(
            &registry_with(&compiler),
            &project,
            &BuildOptions::default(),
            &SilentReporter,
        )
        .unwrap();

        assert_eq!(outcome.artifacts, vec![PathBuf::from("build/obj/main.o")]);
        assert_eq!(outcome.output, Some(PathBuf::from("build/demo")));
        assert_eq!(
            compiler.links(),
            vec![(
                vec![PathBuf::from("build/obj/main.o")],
                PathBuf::from("build/demo")
            )]
        );
        assert!(tmp.path().join("build/demo").exists());
    }

    #[test]
    fn test_per_directory_naming_keeps_same_names_apart() {
        let tmp = TempDir::new().unwrap();
        let project = wildcard_project(tmp.path(), &["src/net/io.c", "src/disk/io.c"]);
        let compiler = fake().with_naming(ArtifactNaming::PerDirectory { extension: ".o" });

        let outcome = build(
            &registry_with(&compiler),
            &project,
            &BuildOptions::default(),
            &SilentReporter,
        )
        .unwrap();

        assert_eq!(
            outcome.artifacts,
            vec![
                PathBuf::from("build/obj/disk/io.o"),
                PathBuf::from("build/obj/net/io.o")
            ]
        );
        assert!(tmp.path().join("build/obj/disk/io.o").exists());
        assert!(tmp.path().join("build/obj/net/io.o").exists());
    }

    #[test]
    fn test_incremental_skips_current_sources() {
        let tmp = TempDir::new().unwrap();
        let project = wildcard_project(tmp.path(), &["src/a.c", "src/b.c"]);
        let compiler = fake();
        let registry = registry_with(&compiler);

        let base = SystemTime::now() - Duration::from_secs(3600);
        set_mtime(&tmp.path().join("src/a.c"), base);
        set_mtime(&tmp.path().join("src/b.c"), base);
        fs::create_dir_all(tmp.path().join("build/obj")).unwrap();
        fs::write(tmp.path().join("build/obj/a.o"), "").unwrap();
        set_mtime(
            &tmp.path().join("build/obj/a.o"),
            base + Duration::from_secs(60),
        );

        let outcome = build(&registry, &project, &BuildOptions::default(), &SilentReporter).unwrap();

        assert_eq!(compiler.assembled(), vec![PathBuf::from("src/b.c")]);
        assert_eq!(outcome.compiled, 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(
            outcome.artifacts,
            vec![
                PathBuf::from("build/obj/a.o"),
                PathBuf::from("build/obj/b.o")
            ]
        );
    }

    #[test]
    fn test_incremental_disabled_rebuilds_all() {
        let tmp = TempDir::new().unwrap();
        let project = wildcard_project(tmp.path(), &["src/a.c", "src/b.c"]);
        let compiler = fake();
        let registry = registry_with(&compiler);

        build(&registry, &project, &BuildOptions::default(), &SilentReporter).unwrap();
        let opts = BuildOptions {
            overrides: BuildOverrides {
                incremental: Some(false),
                ..BuildOverrides::default()
            },
            ..BuildOptions::default()
        };
        let outcome = build(&registry, &project, &opts, &SilentReporter).unwrap();

        assert_eq!(outcome.compiled, 2);
        assert_eq!(compiler.assembled().len(), 4);
    }

    #[test]
    fn test_second_build_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        let project = wildcard_project(tmp.path(), &["src/a.c", "src/b.c"]);
        let compiler = fake();
        let registry = registry_with(&compiler);

        build(&registry, &project, &BuildOptions::default(), &SilentReporter).unwrap();
        let outcome = build(&registry, &project, &BuildOptions::default(), &SilentReporter).unwrap();

        assert_eq!(outcome.compiled, 0);
        assert_eq!(outcome.skipped, 2);
        assert_eq!(compiler.assembled().len(), 2);
    }

    #[test]
    fn test_parallel_failure_aggregates_and_skips_link() {
        let tmp = TempDir::new().unwrap();
        let project = wildcard_project(tmp.path(), &["src/a.c", "src/b.c", "src/c.c", "src/d.c"]);
        let compiler = fake().failing_on("src/b.c").failing_on("src/d.c");
        let reporter = RecordingReporter::default();
        let opts = BuildOptions {
            overrides: BuildOverrides {
                jobs: Some(4),
                ..BuildOverrides::default()
            },
            ..BuildOptions::default()
        };

        let err = build(&registry_with(&compiler), &project, &opts, &reporter).unwrap_err();

        assert!(matches!(err, BuildError::AggregateAssemble { .. }));
        assert_eq!(err.assemble_errors().len(), 2);
        assert!(compiler.links().is_empty());
        assert!(!tmp.path().join("build/demo").exists());

        let finished = reporter.events().into_iter().last().unwrap();
        match finished {
            BuildEvent::BuildFinished {
                success, errors, ..
            } => {
                assert!(!success);
                assert_eq!(errors.len(), 2);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_failed_assemble_is_rebuilt_next_time() {
        let tmp = TempDir::new().unwrap();
        let project = ProjectFixture::new("demo")
            .configure(|c| c.build.backend = "fake".to_string())
            .with_file("src/main.c", "int main(void) { return 0; }\n")
            .write_to(tmp.path())
            .unwrap();
        let broken = fake().failing_on("src/main.c").leaving_partial_output();

        let err = build(
            &registry_with(&broken),
            &project,
            &BuildOptions::default(),
            &SilentReporter,
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::Assemble(_)));
        assert!(!tmp.path().join("build/obj/main.o").exists());

        let compiler = fake();
        let outcome = build(
            &registry_with(&compiler),
            &project,
            &BuildOptions::default(),
            &SilentReporter,
        )
        .unwrap();

        assert_eq!(outcome.compiled, 1);
        assert_eq!(outcome.skipped, 0);
        assert_eq!(compiler.assembled(), vec![PathBuf::from("src/main.c")]);
        assert_eq!(compiler.links().len(), 1);
    }

    #[test]
    fn test_colliding_artifacts_fail_before_assembling() {
        let tmp = TempDir::new().unwrap();
        let project = wildcard_project(tmp.path(), &["src/a.c", "src/a.cpp"]);
        let compiler = FakeCompiler::new("fake", &[".c", ".cpp"])
            .with_naming(ArtifactNaming::PerDirectory { extension: ".o" });

        let err = build(
            &registry_with(&compiler),
            &project,
            &BuildOptions::default(),
            &SilentReporter,
        )
        .unwrap_err();

        match &err {
            BuildError::ArtifactCollision { artifact, sources } => {
                assert_eq!(artifact, &PathBuf::from("build/obj/a.o"));
                assert_eq!(sources.len(), 2);
            }
            other => panic!("expected ArtifactCollision, got {:?}", other),
        }
        assert_eq!(err.exit_code(), crate::error::EXIT_BUILD_FAILURE);
        assert!(compiler.assembled().is_empty());
        assert!(compiler.links().is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential_artifacts() {
        let files = ["src/e.c", "src/a.c", "src/net/io.c", "src/c.c", "src/b.c"];

        let seq_tmp = TempDir::new().unwrap();
        let seq_project = wildcard_project(seq_tmp.path(), &files);
        let sequential = build(
            &registry_with(&fake()),
            &seq_project,
            &BuildOptions::default(),
            &SilentReporter,
        )
        .unwrap();

        let par_tmp = TempDir::new().unwrap();
        let par_project = wildcard_project(par_tmp.path(), &files);
        let compiler = fake().with_delay(Duration::from_millis(3));
        let opts = BuildOptions {
            overrides: BuildOverrides {
                jobs: Some(4),
                ..BuildOverrides::default()
            },
            ..BuildOptions::default()
        };
        let parallel = build(&registry_with(&compiler), &par_project, &opts, &SilentReporter).unwrap();

        assert_eq!(parallel.artifacts, sequential.artifacts);
        assert_eq!(compiler.links()[0].0, sequential.artifacts);
    }

    #[test]
    fn test_link_disabled_and_forced() {
        let tmp = TempDir::new().unwrap();
        let project = ProjectFixture::new("demo")
            .configure(|c| {
                c.build.backend = "fake".to_string();
                c.build.link = false;
            })
            .with_file("src/main.c", "int main(void) { return 0; }\n")
            .write_to(tmp.path())
            .unwrap();
        let compiler = fake();
        let registry = registry_with(&compiler);

        let outcome = build(&registry, &project, &BuildOptions::default(), &SilentReporter).unwrap();
        assert_eq!(outcome.output, None);
        assert!(compiler.links().is_empty());

        let forced = BuildOptions {
            overrides: BuildOverrides {
                force_link: true,
                ..BuildOverrides::default()
            },
            ..BuildOptions::default()
        };
        let outcome = build(&registry, &project, &forced, &SilentReporter).unwrap();
        assert_eq!(outcome.output, Some(PathBuf::from("build/demo")));
        assert!(!project.config().build.link);
    }

    #[test]
    fn test_link_failure() {
        let tmp = TempDir::new().unwrap();
        let project = wildcard_project(tmp.path(), &["src/a.c"]);
        let compiler = fake().failing_link();

        let err = build(
            &registry_with(&compiler),
            &project,
            &BuildOptions::default(),
            &SilentReporter,
        )
        .unwrap_err();

        assert!(matches!(err, BuildError::Link { .. }));
        assert_eq!(err.exit_code(), crate::error::EXIT_BUILD_FAILURE);
    }

    #[test]
    fn test_no_sources_found() {
        let tmp = TempDir::new().unwrap();
        let project = wildcard_project(tmp.path(), &["src/readme.md"]);
        let compiler = fake();

        let err = build(
            &registry_with(&compiler),
            &project,
            &BuildOptions::default(),
            &SilentReporter,
        )
        .unwrap_err();

        assert!(matches!(err, BuildError::NoSourcesFound { .. }));
        assert!(compiler.assembled().is_empty());
    }

    #[test]
    fn test_unknown_backend() {
        let tmp = TempDir::new().unwrap();
        let project = ProjectFixture::new("demo")
            .configure(|c| c.build.backend = "cobol".to_string())
            .with_file("src/main.c", "")
            .write_to(tmp.path())
            .unwrap();

        let err = build(
            &registry_with(&fake()),
            &project,
            &BuildOptions::default(),
            &SilentReporter,
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::UnknownBackend { .. }));
    }

    #[test]
    fn test_lint_warning_does_not_fail_build() {
        let tmp = TempDir::new().unwrap();
        let project = ProjectFixture::new("demo")
            .configure(|c| {
                c.build.backend = "fake".to_string();
                c.dependencies.insert("foo".to_string(), "1.0".to_string());
                c.categories.insert("foo".to_string(), "runtime".to_string());
            })
            .with_file("src/main.c", "")
            .write_to(tmp.path())
            .unwrap();
        let reporter = RecordingReporter::default();

        let outcome = build(
            &registry_with(&fake()),
            &project,
            &BuildOptions::default(),
            &reporter,
        )
        .unwrap();

        assert_eq!(outcome.warnings.len(), 1);
        assert!(reporter
            .events()
            .iter()
            .any(|e| matches!(e, BuildEvent::LintWarning { dependency, .. } if dependency == "foo")));
    }

    #[test]
    fn test_runner_build_only_validates() {
        let tmp = TempDir::new().unwrap();
        let project = ProjectFixture::new("demo")
            .configure(|c| {
                c.project.main = PathBuf::from("src/main.py");
                c.build.backend = "script".to_string();
            })
            .with_file("src/main.py", "print('hi')\n")
            .write_to(tmp.path())
            .unwrap();
        let mut registry = BackendRegistry::empty();
        registry.register_runner(|| Box::new(FakeRunner::new("script", &[".py"])));

        let outcome = build(&registry, &project, &BuildOptions::default(), &SilentReporter).unwrap();

        assert_eq!(outcome.kind, BackendKind::Runner);
        assert_eq!(outcome.sources, vec![PathBuf::from("src/main.py")]);
        assert!(outcome.artifacts.is_empty());
        assert!(!tmp.path().join("build").exists());
    }

    #[test]
    fn test_test_entry_build() {
        let tmp = TempDir::new().unwrap();
        let project = ProjectFixture::new("demo")
            .configure(|c| {
                c.build.backend = "fake".to_string();
                c.build.wildcard = true;
            })
            .with_file("src/main.c", "")
            .with_file("src/util.c", "")
            .with_file("tests/main_test.c", "")
            .write_to(tmp.path())
            .unwrap();
        let compiler = fake();
        let opts = BuildOptions {
            overrides: BuildOverrides {
                test_entry: Some(PathBuf::from("tests/main_test.c")),
                ..BuildOverrides::default()
            },
            ..BuildOptions::default()
        };

        let outcome = build(&registry_with(&compiler), &project, &opts, &SilentReporter).unwrap();

        assert_eq!(
            outcome.sources,
            vec![
                PathBuf::from("tests/main_test.c"),
                PathBuf::from("src/util.c")
            ]
        );
        assert_eq!(
            outcome.artifacts,
            vec![
                PathBuf::from("build/obj/tests_main_test.o"),
                PathBuf::from("build/obj/util.o")
            ]
        );
    }

    #[test]
    fn test_clean_forces_rebuild() {
        let tmp = TempDir::new().unwrap();
        let project = wildcard_project(tmp.path(), &["src/a.c"]);
        let compiler = fake();
        let registry = registry_with(&compiler);

        build(&registry, &project, &BuildOptions::default(), &SilentReporter).unwrap();
        let opts = BuildOptions {
            clean: true,
            ..BuildOptions::default()
        };
        let outcome = build(&registry, &project, &opts, &SilentReporter).unwrap();

        assert_eq!(outcome.compiled, 1);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_lint_project() {
        let tmp = TempDir::new().unwrap();
        let project = ProjectFixture::new("demo")
            .configure(|c| {
                c.build.backend = "fake".to_string();
                c.dependencies.insert("bar".to_string(), "*".to_string());
            })
            .write_to(tmp.path())
            .unwrap();

        let findings =
            lint_project(&registry_with(&fake()), &project, &BuildOverrides::default()).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].dependency, "bar");
    }
}
