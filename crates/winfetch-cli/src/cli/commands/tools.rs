use winfetch_core::tools::{Tool, ToolSet};

pub fn run_tools(tools: &ToolSet) {
    println!("{:<14} {:<8} {}", "TOOL", "STATUS", "DETAIL");
    for tool in Tool::ALL {
        match tools.path(tool) {
            Some(path) => println!("{:<14} {:<8} {}", tool.executable(), "found", path.display()),
            None => println!(
                "{:<14} {:<8} install with: {}",
                tool.executable(),
                "missing",
                tool.install_hint()
            ),
        }
    }
    if !tools.has(Tool::Cabextract) && !tools.has(Tool::Tar) && !tools.has(Tool::SevenZip) {
        println!("No archive tool found; catalog extraction will rely on the raw scan.");
    }
}
