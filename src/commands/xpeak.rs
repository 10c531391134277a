//! # xpeak 子命令实现
//!
//! 交互式 XRD 峰位指标化：逐个显示参考表中反射的预测角，由操作者输入
//! 观测角，最后导出 `<stem>_peak.csv`。
//!
//! ## 流程
//! 1. 校验参数，构造只读配置（此前不做任何文件 I/O）
//! 2. 按结构模式打开参考表
//! 3. 在 stdin/stdout 上运行指标化会话
//! 4. 写出峰位表并打印汇总
//!
//! ## 依赖关系
//! - 使用 `cli/xpeak.rs` 定义的 XpeakArgs
//! - 使用 `parsers/reflections.rs` 读取参考表
//! - 使用 `xpeak/` 模块进行计算与导出

use crate::cli::xpeak::XpeakArgs;
use crate::error::{QcError, Result};
use crate::models::peak::Derived;
use crate::models::{Config, PeakTable, StructureMode};
use crate::parsers::ReflectionReader;
use crate::utils::format::format_decimal;
use crate::utils::output;
use crate::xpeak::{export, IndexingSession};

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// 已解析的运行参数
#[derive(Debug)]
pub struct XpeakPlan {
    pub config: Config,
    pub table_path: PathBuf,
    pub output_path: PathBuf,
}

/// 执行 xpeak
pub fn execute(args: XpeakArgs) -> Result<()> {
    let plan = build_plan(&args)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_plan(&plan, stdin.lock(), stdout.lock())?;

    Ok(())
}

/// 由命令行参数构造配置与路径
pub fn build_plan(args: &XpeakArgs) -> Result<XpeakPlan> {
    let mode = StructureMode::from_flag(args.crystal);
    let config = Config::new(args.wavelength, args.lattice_constant, mode)?;

    let table_dir = match &args.table_dir {
        Some(dir) => dir.clone(),
        None => default_table_dir()?,
    };

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| export::peak_csv_path(&args.input));

    Ok(XpeakPlan {
        config,
        table_path: table_dir.join(mode.table_file_name()),
        output_path,
    })
}

/// 打开参考表、运行会话并写出峰位表
///
/// 参考表打开成功后才输出标题与操作说明。
pub fn run_plan<I: BufRead, W: Write>(
    plan: &XpeakPlan,
    input: I,
    mut out: W,
) -> Result<PeakTable> {
    let reflections = ReflectionReader::open(&plan.table_path, plan.config.mode)?;

    write_banner(plan, &mut out)?;
    let table = IndexingSession::new(&plan.config, reflections).run(input, &mut out)?;

    export::write_peak_table(&table, &plan.output_path)?;

    print_peak_table(&table);
    output::print_success(&format!(
        "{} peaks saved to '{}'",
        table.len(),
        plan.output_path.display()
    ));

    Ok(table)
}

/// 会话开始前的标题与操作说明
fn write_banner<W: Write>(plan: &XpeakPlan, out: &mut W) -> Result<()> {
    let lines = [
        output::header_block("XRD Peak Indexing"),
        output::info_line(&format!("Structure: {}", plan.config.mode)),
        output::info_line(&format!(
            "Wavelength: {} Å, lattice constant: {} Å",
            plan.config.wavelength, plan.config.lattice_constant
        )),
        output::info_line("Enter the observed angle, a blank line to skip, Ctrl-D to finish"),
    ];

    lines
        .iter()
        .try_for_each(|line| writeln!(out, "{}", line))
        .and_then(|_| out.flush())
        .map_err(QcError::Terminal)
}

/// 参考表默认目录 `~/qc`
fn default_table_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join("qc"))
        .ok_or_else(|| {
            QcError::InvalidArgument(
                "cannot locate the home directory; pass --table-dir".to_string(),
            )
        })
}

/// 打印峰位汇总表格
fn print_peak_table(table: &PeakTable) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct PeakRow {
        #[tabled(rename = "index")]
        indices: String,
        #[tabled(rename = "θ obs (°)")]
        observed: String,
        #[tabled(rename = "NR")]
        nr: String,
        #[tabled(rename = "a (Å)")]
        lattice_constant: String,
    }

    let show = |v: &Derived| match v {
        Ok(v) => format_decimal(*v),
        Err(_) => "-".to_string(),
    };

    let rows: Vec<PeakRow> = table
        .records()
        .iter()
        .map(|r| PeakRow {
            indices: format!("({})", r.indices.join(", ")),
            observed: r.observed.clone(),
            nr: show(&r.nr),
            lattice_constant: show(&r.lattice_constant),
        })
        .collect();

    if table.is_empty() {
        output::print_warning("No peaks recorded");
        return;
    }

    output::print_header(&format!("Recorded {} Peaks", rows.len()));
    println!("{}", Table::new(&rows));
    output::print_separator();
}
