//! Output writing with a staged commit.
//!
//! Every generated file is first written into a staging directory inside the output
//! directory. Only after staging fully succeeds are the managed directories swapped
//! into place, and a failed swap restores the previous tree. The live output is
//! therefore never left half old, half new.

use crate::config::ProjectLayout;
use crate::error::CompileError;
use crate::registry::{SkillLocation, SKILL_MAIN_FILE};
use crate::resolve::Skill;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use walkdir::WalkDir;

/// Output subdirectories rebuilt from scratch on every run
pub const MANAGED_DIRS: [&str; 3] = ["agents", "skills", "commands"];

const STAGING_PREFIX: &str = ".agentc-staging-";
const PREVIOUS_DIR: &str = ".previous";

/// Rendered document for one agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAgent {
    pub id: String,
    pub content: String,
}

/// Counts and digest of what a write committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub agents: usize,
    pub skills: usize,
    pub commands: usize,
    pub files: usize,
    /// blake3 digest over relative paths and contents of every committed file
    pub fingerprint: String,
}

/// Directory name used for a skill in the output tree
pub fn skill_output_name(skill_id: &str) -> String {
    skill_id.replace(['/', '\\'], "-")
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CompileError + '_ {
    move |e| CompileError::write(path, e)
}

struct Staging {
    dir: TempDir,
    root_document: NamedTempFile,
    summary: WriteSummary,
}

/// Writes a compiled profile into the output directories
pub struct OutputWriter<'a> {
    layout: &'a ProjectLayout,
    root_document_name: &'a str,
}

impl<'a> OutputWriter<'a> {
    pub fn new(layout: &'a ProjectLayout, root_document_name: &'a str) -> Self {
        Self {
            layout,
            root_document_name,
        }
    }

    /// Stage all output, then commit it over the live tree.
    pub fn write(
        &self,
        agents: &[RenderedAgent],
        skills: &[&Skill],
        claude_md: &Path,
    ) -> Result<WriteSummary, CompileError> {
        let staging = self.stage(agents, skills, claude_md)?;
        tracing::debug!(
            files = staging.summary.files,
            "Staged output in {}",
            staging.dir.path().display()
        );
        self.commit(staging)
    }

    fn stage(
        &self,
        agents: &[RenderedAgent],
        skills: &[&Skill],
        claude_md: &Path,
    ) -> Result<Staging, CompileError> {
        let output_dir = self.layout.output_dir();
        fs::create_dir_all(output_dir).map_err(io_error(output_dir))?;
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(output_dir)
            .map_err(io_error(output_dir))?;

        let agents_dir = dir.path().join("agents");
        fs::create_dir_all(&agents_dir).map_err(io_error(&agents_dir))?;
        for agent in agents {
            let path = agents_dir.join(format!("{}.md", agent.id));
            fs::write(&path, &agent.content).map_err(io_error(&path))?;
            tracing::debug!(agent = %agent.id, "Staged agent document");
        }

        let skills_dir = dir.path().join("skills");
        fs::create_dir_all(&skills_dir).map_err(io_error(&skills_dir))?;
        let mut skill_count = 0;
        for skill in skills {
            let location = match &skill.location {
                Some(location) => location,
                None => {
                    tracing::debug!(skill = %skill.id, "Skipping skill without path");
                    continue;
                }
            };
            self.stage_skill(&skills_dir, &skill.id, location)?;
            skill_count += 1;
        }

        let command_count = self.stage_commands(&dir.path().join("commands"))?;

        let root_document = self.stage_root_document(claude_md)?;

        let fingerprint = fingerprint(dir.path(), root_document.path(), self.root_document_name)?;
        let files = WalkDir::new(dir.path())
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .count()
            + 1;

        Ok(Staging {
            dir,
            root_document,
            summary: WriteSummary {
                agents: agents.len(),
                skills: skill_count,
                commands: command_count,
                files,
                fingerprint,
            },
        })
    }

    fn stage_skill(
        &self,
        skills_dir: &Path,
        skill_id: &str,
        location: &SkillLocation,
    ) -> Result<(), CompileError> {
        let target = skills_dir.join(skill_output_name(skill_id));
        fs::create_dir_all(&target).map_err(io_error(&target))?;

        let main_file = self.layout.source_path(&location.main_file());
        let main_target = target.join(SKILL_MAIN_FILE);
        fs::copy(&main_file, &main_target).map_err(io_error(&main_file))?;

        if let SkillLocation::Directory { path, extras } = location {
            let source_dir = self.layout.source_path(path);
            for extra in extras {
                let source = source_dir.join(extra);
                if source.is_file() {
                    let dest = target.join(extra);
                    if let Some(parent) = dest.parent() {
                        fs::create_dir_all(parent).map_err(io_error(parent))?;
                    }
                    fs::copy(&source, &dest).map_err(io_error(&source))?;
                } else if source.is_dir() {
                    copy_dir(&source, &target.join(extra))?;
                }
            }
        }
        tracing::debug!(skill = skill_id, "Staged skill");
        Ok(())
    }

    fn stage_commands(&self, target: &Path) -> Result<usize, CompileError> {
        let source = self.layout.commands_dir();
        if !source.is_dir() {
            return Ok(0);
        }
        fs::create_dir_all(target).map_err(io_error(target))?;

        let mut files: Vec<PathBuf> = fs::read_dir(&source)
            .map_err(io_error(&source))?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
            .collect();
        files.sort();

        for file in &files {
            if let Some(name) = file.file_name() {
                let dest = target.join(name);
                fs::copy(file, &dest).map_err(io_error(file))?;
            }
        }
        Ok(files.len())
    }

    fn stage_root_document(&self, claude_md: &Path) -> Result<NamedTempFile, CompileError> {
        let source = self.layout.source_path(claude_md);
        let content = fs::read(&source).map_err(io_error(&source))?;

        let output_root = self.layout.output_root();
        fs::create_dir_all(output_root).map_err(io_error(output_root))?;
        let mut file = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(output_root)
            .map_err(io_error(output_root))?;
        file.write_all(&content).map_err(io_error(file.path()))?;
        file.flush().map_err(io_error(file.path()))?;
        Ok(file)
    }

    fn commit(&self, staging: Staging) -> Result<WriteSummary, CompileError> {
        let Staging {
            dir,
            root_document,
            summary,
        } = staging;
        let output_dir = self.layout.output_dir();
        let previous = dir.path().join(PREVIOUS_DIR);
        fs::create_dir_all(&previous).map_err(io_error(&previous))?;

        let mut swap = Swap::default();
        for name in MANAGED_DIRS {
            let live = output_dir.join(name);
            let staged = dir.path().join(name);
            if let Err(err) = swap.replace(&live, &staged, &previous.join(name)) {
                return Err(rollback_or_keep(swap, dir, err));
            }
        }

        let root_target = self.layout.output_root().join(self.root_document_name);
        if let Err(err) = root_document.persist(&root_target) {
            let err = CompileError::write(&root_target, err.error);
            return Err(rollback_or_keep(swap, dir, err));
        }

        if let Err(e) = dir.close() {
            tracing::warn!("Failed to remove staging directory: {}", e);
        }
        tracing::info!(
            agents = summary.agents,
            skills = summary.skills,
            commands = summary.commands,
            "Committed output to {}",
            output_dir.display()
        );
        Ok(summary)
    }
}

/// Record of directory moves made during commit, for rollback
#[derive(Default)]
struct Swap {
    moved_aside: Vec<(PathBuf, PathBuf)>,
    installed: Vec<PathBuf>,
}

impl Swap {
    fn replace(&mut self, live: &Path, staged: &Path, aside: &Path) -> Result<(), CompileError> {
        if live.exists() {
            fs::rename(live, aside).map_err(io_error(live))?;
            self.moved_aside.push((live.to_path_buf(), aside.to_path_buf()));
        }
        if staged.exists() {
            fs::rename(staged, live).map_err(io_error(live))?;
            self.installed.push(live.to_path_buf());
        }
        Ok(())
    }

    /// Undo every move. Returns false if any previous directory could not be restored.
    fn rollback(&mut self) -> bool {
        for live in self.installed.drain(..).rev() {
            if let Err(e) = fs::remove_dir_all(&live) {
                tracing::error!("Rollback failed to remove {}: {}", live.display(), e);
            }
        }
        let mut restored = true;
        for (live, aside) in self.moved_aside.drain(..).rev() {
            if let Err(e) = fs::rename(&aside, &live) {
                tracing::error!("Rollback failed to restore {}: {}", live.display(), e);
                restored = false;
            }
        }
        restored
    }
}

/// Roll back a failed commit. When a previous directory cannot be restored, the
/// staging directory holding it is kept on disk and named in the error.
fn rollback_or_keep(mut swap: Swap, staging: TempDir, err: CompileError) -> CompileError {
    if swap.rollback() {
        return err;
    }
    keep_staging(staging, err)
}

fn keep_staging(staging: TempDir, err: CompileError) -> CompileError {
    let kept = staging.into_path();
    tracing::error!("Previous output kept in {}", kept.display());
    CompileError::write(
        &kept,
        format!(
            "{}; rollback incomplete, previous output kept in {}",
            err,
            kept.join(PREVIOUS_DIR).display()
        ),
    )
}

fn copy_dir(source: &Path, target: &Path) -> Result<(), CompileError> {
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|e| CompileError::write(source, e))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| CompileError::write(entry.path(), e))?;
        let dest = target.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(io_error(&dest))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &dest).map_err(io_error(entry.path()))?;
        }
    }
    Ok(())
}

/// Digest of every staged file's relative path and bytes, in sorted path order
fn fingerprint(
    staging_dir: &Path,
    root_document: &Path,
    root_document_name: &str,
) -> Result<String, CompileError> {
    let mut hasher = blake3::Hasher::new();
    for entry in WalkDir::new(staging_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| CompileError::write(staging_dir, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(staging_dir)
            .map_err(|e| CompileError::write(entry.path(), e))?;
        let bytes = fs::read(entry.path()).map_err(io_error(entry.path()))?;
        hash_entry(&mut hasher, &relative.to_string_lossy().replace('\\', "/"), &bytes);
    }
    let bytes = fs::read(root_document).map_err(io_error(root_document))?;
    hash_entry(&mut hasher, root_document_name, &bytes);
    Ok(hex::encode(hasher.finalize().as_bytes()))
}

fn hash_entry(hasher: &mut blake3::Hasher, name: &str, bytes: &[u8]) {
    hasher.update(&(name.len() as u64).to_le_bytes());
    hasher.update(name.as_bytes());
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
