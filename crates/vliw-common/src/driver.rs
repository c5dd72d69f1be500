use crate::bundle::Schedule;
use crate::message::Messages;

pub trait Driver {
    fn report(&mut self, messages: Messages);

    /// Called once a schedule has been produced. `name` is the mnemonic of the
    /// loop branch the schedule uses.
    fn report_schedule(&mut self, name: &str, schedule: &Schedule) {
        let _ = (name, schedule);
    }
}
