// apps/jl_cli/src/commands/mod.rs

//! 子命令实现

pub mod defaults;
pub mod generate;
pub mod inspect;
pub mod validate;

use jl_ics::BoundaryRole;

/// 打印角色分布表
pub(crate) fn print_role_histogram(histogram: &[(BoundaryRole, usize)]) {
    println!("  {:<28} {:>10}", "角色", "数量");
    for (role, count) in histogram {
        println!("  {:<28} {:>10}", role.name(), count);
    }
}
