use std::io::Write;

fn main() {
    let matches = atdd_cli::command().get_matches();
    atdd_cli::logging::init(matches.get_count("verbose"), matches.get_flag("log-json"));

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    let code = match atdd_cli::run(&matches, &mut out, &mut err) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            let _ = writeln!(err, "error: {e:#}");
            2
        }
    };
    let _ = out.flush();
    std::process::exit(code);
}
