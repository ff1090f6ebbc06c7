// src/main.rs

use clap::{ArgAction, Parser};
use scopeframe::config::{NamespacePolicy, ResolverConfig};
use scopeframe::diagnostics::DiagnosticBag;
use scopeframe::reporter;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

/// 解析 `///` 注解并报告每个被注解的名字所在的 frame
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 需要分析的源文件路径
    input_file: String,

    /// 命名空间中的声明如何分类
    #[arg(long, value_enum, default_value_t = NamespacePolicy::Transparent)]
    namespace_policy: NamespacePolicy,

    /// 出现任何错误（包括 frame 断言不成立）时以非零状态退出
    #[arg(long)]
    check: bool,

    /// 在结果之前打印作用域树
    #[arg(long)]
    dump_scopes: bool,

    /// 提高日志级别，可以重复：-v 为 debug，-vv 为 trace
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source_code = fs::read_to_string(&cli.input_file)
        .map_err(|e| format!("Failed to read file '{}': {}", cli.input_file, e))?;

    // 1. 创建“诊断背包”，它将收集所有阶段的错误
    let mut diagnostics = DiagnosticBag::new(&source_code);
    let config = ResolverConfig::default().with_namespace_policy(cli.namespace_policy);

    // 2. 分析并输出结果
    let Some(resolution) = scopeframe::analyze(&source_code, &config, &mut diagnostics) else {
        eprintln!("Analysis of '{}' failed.", cli.input_file);
        diagnostics.print(&cli.input_file);
        process::exit(1);
    };

    if cli.dump_scopes {
        for line in reporter::dump_scopes(&resolution.graph) {
            println!("{}", line);
        }
    }
    for line in reporter::render(&resolution) {
        println!("{}", line);
    }

    // 3. 非致命的问题照常打印
    let (errors, warnings) = (diagnostics.error_count(), diagnostics.warning_count());
    if !diagnostics.is_empty() {
        diagnostics.print(&cli.input_file);
        eprintln!("{}: {} error(s), {} warning(s)", cli.input_file, errors, warnings);
    }
    if cli.check && errors > 0 {
        process::exit(1);
    }

    Ok(())
}
