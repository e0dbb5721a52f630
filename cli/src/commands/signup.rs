//! Operator sign-up

use colored::Colorize;

use super::Context;
use crate::error::CliResult;

/// Marks this machine as signed up; dashboards and builders read the flag.
pub async fn handle(ctx: &Context, sign_out: bool) -> CliResult<()> {
    let cache = ctx.library.cache();
    cache.set_logged_in(!sign_out)?;
    if sign_out {
        println!("Signed out");
    } else {
        println!("{} You can now create forms with `striform forms create`", "Signed up.".green());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::output::OutputFormat;
    use striform_core::{FormLibrary, LocalCache};

    #[tokio::test]
    async fn test_signup_then_sign_out() {
        let ctx = Context::with_library(
            FormLibrary::offline(LocalCache::in_memory()),
            Config::default(),
            OutputFormat::Json,
        );
        handle(&ctx, false).await.unwrap();
        assert!(ctx.library.cache().is_logged_in().unwrap());
        handle(&ctx, true).await.unwrap();
        assert!(!ctx.library.cache().is_logged_in().unwrap());
    }
}
