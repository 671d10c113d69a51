fn main() {
    // Tell cargo to recompile when these compile-time env vars change.
    // Without this, option_env!() values get cached and won't update.
    println!("cargo:rerun-if-env-changed=HOBBYHUB_API_URL");
    println!("cargo:rerun-if-env-changed=HOBBYHUB_IDENTITY_API_KEY");
    println!("cargo:rerun-if-env-changed=HOBBYHUB_IDENTITY_URL");
    println!("cargo:rerun-if-env-changed=HOBBYHUB_TOKEN_URL");
    println!("cargo:rerun-if-env-changed=HOBBYHUB_WEB_APP_URL");
}
