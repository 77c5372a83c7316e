use std::ffi::OsStr;
use std::io::ErrorKind;
use std::process::Output;

use tokio::process::Command;
use tracing::debug;

use crate::error::RecognitionError;

/// 运行外部命令并收集输出，非零退出码视为失败
pub async fn run_tool<I, S>(program: &str, args: I) -> Result<Output, RecognitionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args);
    debug!("执行外部命令: {:?}", command.as_std());

    let output = command.output().await.map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            RecognitionError::ToolNotFound {
                tool: program.to_string(),
            }
        } else {
            RecognitionError::SpawnFailed {
                tool: program.to_string(),
                source,
            }
        }
    })?;

    if !output.status.success() {
        return Err(RecognitionError::ToolFailed {
            tool: program.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool() {
        let err = tokio_test::block_on(run_tool(
            "gazette-archiver-strumento-inesistente",
            ["--version"],
        ))
        .unwrap_err();
        assert!(matches!(err, RecognitionError::ToolNotFound { .. }));
    }
}
