//! Sandbox template blueprint
//!
//! Every docker tag is built into the same kind of sandbox: the app lives in
//! [`APP_DIR`], pm2 starts it, and the sandbox is ready once the app's
//! `package.json` is in place.

use kiln_core::domain::template::{ReadyCommand, TemplateSpec};

pub const APP_DIR: &str = "/home/user/app";
pub const START_CMD: &str = "pm2 start /home/user/utils/ecosystem.config.json";
const READY_FILE: &str = "/home/user/app/package.json";

/// Template descriptor for a sandbox built from `docker_tag`
///
/// The provider cache is skipped so each run rebuilds from the pushed image.
pub fn sandbox_template(docker_tag: &str) -> TemplateSpec {
    TemplateSpec::from_image(docker_tag)
        .skip_cache()
        .set_workdir(APP_DIR)
        .set_envs([("PROJECT_ROOT", APP_DIR)])
        .set_start_cmd(START_CMD, ReadyCommand::wait_for_file(READY_FILE))
}
