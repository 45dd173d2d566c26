use std::io::IsTerminal;

use crate::{bootstrap::BootStrap, clap_app};
use clap::ArgMatches;
use ytcard::{controller::WidgetController, debug, error::*};

pub struct App {
    pub matches: ArgMatches,
}

impl App {
    pub fn new() -> Result<Self> {
        #[cfg(windows)]
        let _ = nu_ansi_term::enable_ansi_support();

        let interactive_output = std::io::stdout().is_terminal();

        Ok(App {
            matches: Self::matches(interactive_output)?,
        })
    }

    pub fn matches(interactive_output: bool) -> Result<ArgMatches> {
        Ok(clap_app::build_app(interactive_output).get_matches())
    }

    /// Start the application, bootstraps the configuration and forwards the request to the controller.
    ///
    /// # Returns
    /// `Ok(())` once the widget was written, the fatal error otherwise.
    pub fn start(&self) -> Result<()> {
        let bootstrap = BootStrap::new(&self.matches)?;
        let controller =
            WidgetController::with_defaults(bootstrap.config(), bootstrap.paths(), bootstrap.clips());

        let report = controller.run()?;

        debug!(
            "Background : {} ({} warning(s))",
            report.background,
            report.warnings.len()
        );
        println!("Wrote: {}", report.output.to_string_lossy());

        Ok(())
    }
}
