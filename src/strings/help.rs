//! # Help Text
//!
//! The `/help` screen.

pub const MAIN: &str = "\
📖 **Help**

**Available commands:**
/start - Start the bot
/menu - Main menu
/events - Playbill of upcoming performances
/tickets - My tickets
/help - This screen

Menu items are plain tokens: send the token shown next to an entry
(for example `events_list`) to open it.

If you have any questions, contact support: @support";
