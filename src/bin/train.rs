/// Обучение моделей и запись артефактов

use anyhow::Context;

use cardio_risk::{training, Config};

fn main() -> anyhow::Result<()> {
    cardio_risk::init_logging();

    let config = Config::from_env()?;
    training::run(&config).with_context(|| {
        format!("Training on {} failed", config.dataset_path.display())
    })?;

    println!("{}", training::SUCCESS_MESSAGE);
    Ok(())
}
