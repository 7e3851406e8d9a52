use std::sync::Arc;

use arcstr::ArcStr;
use espack_common::{ModuleFile, Program};
use espack_error::{BuildResult, BundleError, BundlingError};

use crate::analyze::analyze_declarations;
use crate::module_loader::ModuleLoaderMsg;
use crate::types::{ModuleRecord, SharedParser};

use super::task_context::TaskContext;

/// Loads one module: read, parse, analyze. Root tasks arrive with their
/// content pre-read; discovered tasks read it themselves.
pub(crate) struct ModuleTask {
  ctx: Arc<TaskContext>,
  file: ModuleFile,
  content: Option<ArcStr>,
}

pub(crate) fn read_module_content(file: &ModuleFile) -> BuildResult<ArcStr> {
  match file.source().read_to_string(file.path()) {
    Ok(content) => Ok(content.into()),
    Err(cause) => Err(BundlingError::read(file.path(), file.source_hint(), cause).into()),
  }
}

fn parse_module_content(parser: &SharedParser, file: &ModuleFile, content: &str) -> BuildResult<Program> {
  parser
    .parse(content)
    .map_err(|cause| BundlingError::parse(file.path(), file.source_hint(), cause).into())
}

impl ModuleTask {
  pub fn new(ctx: Arc<TaskContext>, file: ModuleFile, content: Option<ArcStr>) -> Self {
    Self { ctx, file, content }
  }

  pub async fn run(mut self) {
    let msg = match self.run_inner() {
      Ok(record) => ModuleLoaderMsg::ModuleDone(Box::new(record)),
      Err(error) => ModuleLoaderMsg::BuildError(error),
    };
    self.ctx.tx.send(msg).await.expect("loader outlives its tasks");
  }

  fn run_inner(&mut self) -> BuildResult<ModuleRecord> {
    if self.ctx.cancel.is_cancelled() {
      return Err(BundleError::Cancelled);
    }
    let content = match self.content.take() {
      Some(content) => content,
      None => read_module_content(&self.file)?,
    };

    if self.ctx.cancel.is_cancelled() {
      return Err(BundleError::Cancelled);
    }
    let program = parse_module_content(&self.ctx.parser, &self.file, &content)?;

    let mut record = ModuleRecord::new(self.file.clone(), content, program);
    analyze_declarations(&mut record, &self.ctx.resolver, &self.ctx.prefixes);
    Ok(record)
  }
}
