pub mod tasks;

use crate::common::data_lock::DataLock;
use crate::common::init;
use crate::cron_tasks;
use crate::settings::AppSettings;
use tasks::recalculate_performance::recalculate_performance;
use tasks::refresh_modified_beatmaps::refresh_modified_beatmaps;

pub async fn serve(settings: &AppSettings) -> anyhow::Result<()> {
    let _lock = DataLock::acquire(&settings.data_dir, "recalc-cron")?;
    let ctx = init::initialize_state(settings).await?;
    let failed = cron_tasks! {
        &ctx,
        refresh_modified_beatmaps,
        recalculate_performance,
    };
    if failed > 0 {
        anyhow::bail!("{failed} recalculation task(s) failed");
    }
    Ok(())
}
