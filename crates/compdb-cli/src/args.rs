use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "compdb")]
#[command(about = "Generate compile_commands.json from Kbuild *.o.cmd files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Build output directory [default: $COMPDB_OUT_DIR or the current directory]
    #[arg(short = 'O', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// *.cmd file search paths: directories are searched recursively, files are used as-is
    /// [default: the output directory]
    #[arg(value_name = "PATH")]
    pub search_paths: Vec<PathBuf>,
}
