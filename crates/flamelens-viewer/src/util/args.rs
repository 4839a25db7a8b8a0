use anyhow::Result;
use flamelens_core::Mode;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::profile::WeightKind;

/// Command line overrides; `None` keeps the saved setting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewerArgs {
    pub mode: Option<Mode>,
    pub weight: Option<WeightKind>,
    pub path: Option<PathBuf>,
}

pub fn parse_args() -> Result<ViewerArgs> {
    parse_args_from(std::env::args_os().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ViewerArgs>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = ViewerArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--icicle" {
            out.mode = Some(Mode::Icicle);
        } else if arg == "--flamegraph" {
            out.mode = Some(Mode::Flamegraph);
        } else if arg == "--weight" {
            let Some(value) = args.next() else {
                anyhow::bail!("--weight expects samples|bytes");
            };
            out.weight = Some(WeightKind::parse(&value.to_string_lossy())?);
        } else if arg.to_string_lossy().starts_with("--") {
            anyhow::bail!("unknown argument: {:?}", arg);
        } else if out.path.is_some() {
            anyhow::bail!("only one profile path is accepted, got {:?}", arg);
        } else {
            out.path = Some(PathBuf::from(arg));
        }
    }

    Ok(out)
}
