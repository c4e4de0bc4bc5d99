//! A small composition root: register at startup, lock, then resolve.
//!
//! Run with: `cargo run --example composition_root --features logging-pretty`

use dependency_container::prelude::*;
use dependency_container::ambient;

trait Notifier: Send + Sync {
    fn notify(&self, user: &str) -> String;
}

struct EmailNotifier {
    settings: Arc<Settings>,
}

impl Notifier for EmailNotifier {
    fn notify(&self, user: &str) -> String {
        format!("mail to {user} via {}", self.settings.smtp_host)
    }
}

impl Activatable for EmailNotifier {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![constructor!(|settings: Arc<Settings>| EmailNotifier { settings })]
    }
}

implements!(EmailNotifier => dyn Notifier);

struct Settings {
    smtp_host: String,
}

struct SignupService {
    notifier: Arc<dyn Notifier>,
    logger: Arc<dyn Logger>,
}

impl SignupService {
    fn sign_up(&self, user: &str) -> String {
        self.logger.info(format_args!("signing up {user}"));
        self.notifier.notify(user)
    }
}

impl Activatable for SignupService {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![constructor!(|notifier: Arc<dyn Notifier>, logger: Arc<dyn Logger>| {
            SignupService { notifier, logger }
        })]
    }
}

fn compose() -> Result<Container> {
    let container = Container::builder().capacity(8).build();

    container.register_instance(Settings {
        smtp_host: "smtp.example.com".into(),
    })?;
    container.register::<dyn Notifier, EmailNotifier>(Strategy::Singleton)?;
    container.register_type::<SignupService>(Strategy::PerCall)?;
    container.lock();

    Ok(container)
}

fn main() -> Result<()> {
    #[cfg(feature = "logging")]
    dependency_container::logging::init_container_debug();

    let container = compose()?;
    ambient::set_container(container.clone());

    let signup = ambient::current().resolve::<SignupService>()?;
    println!("{}", signup.sign_up("ada"));

    // Ad-hoc creation bypasses the locked registry
    let staging = container.create_with::<EmailNotifier>([Arg::new(Settings {
        smtp_host: "smtp.staging".into(),
    })])?;
    println!("{}", staging.notify("grace"));

    Ok(())
}
