/// Collects builder warnings so they can be stored on the model, while also
/// forwarding them to the `log` facade.
#[derive(Debug, Default)]
pub(crate) struct Logger {
    msg: Vec<String>,
}

impl Logger {
    pub fn new() -> Logger {
        Logger { msg: Vec::new() }
    }

    pub fn warn(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        log::warn!("[shadergen] {}", msg);
        self.msg.push(msg)
    }

    pub fn finalize(self) -> Vec<String> {
        self.msg
    }
}
