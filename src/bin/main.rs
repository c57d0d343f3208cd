use lambdas::config::{DemoConfig, Executor};
use lambdas::console::Console;
use lambdas::demo;
use lambdas::launcher::ThreadLauncher;
use lambdas::logging;
use lambdas::pool::WorkerPool;
use lambdas::Result;

fn main() -> Result<()> {
    let config = DemoConfig::resolve()?;
    logging::init(&logging::Options {
        verbose: config.verbose,
        color: config.use_colors(),
    })?;
    tracing::debug!(?config, "configuration resolved");

    let console = Console::stdout(config.use_colors());

    // Tasks are joined before exit so delayed output is not cut off. Past
    // this point nothing changes the exit status.
    let outcome = match config.executor {
        Executor::Threads => {
            demo::run(&console, &config, &ThreadLauncher::new()).map(demo::wait_for)
        }
        Executor::Pool => WorkerPool::new(config.workers)
            .and_then(|pool| demo::run(&console, &config, &pool).map(demo::wait_for)),
    };
    if let Err(err) = outcome {
        tracing::error!(error = %err, "demo run stopped early");
    }

    Ok(())
}
