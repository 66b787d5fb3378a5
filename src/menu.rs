//! Static diagnostic command menu.
//!
//! Maps each diagnostic bot command to the literal shell string it runs on
//! the remote host. The table is immutable for the process lifetime.

/// One entry of the diagnostic menu
pub struct MenuEntry {
    /// Bot command name, without the leading slash
    pub name: &'static str,
    /// Shell command executed on the remote host
    pub shell: &'static str,
}

/// The fixed diagnostic menu, in /help order
pub const DIAGNOSTIC_MENU: &[MenuEntry] = &[
    MenuEntry { name: "get_release", shell: "cat /etc/os-release" },
    MenuEntry { name: "get_uname", shell: "uname -a" },
    MenuEntry { name: "get_uptime", shell: "uptime" },
    MenuEntry { name: "get_df", shell: "df -h" },
    MenuEntry { name: "get_free", shell: "free -h" },
    MenuEntry { name: "get_mpstat", shell: "mpstat -a" },
    MenuEntry { name: "get_w", shell: "w" },
    MenuEntry { name: "get_auths", shell: "last" },
    MenuEntry { name: "get_critical", shell: "sudo journalctl -p crit" },
    MenuEntry { name: "get_ps", shell: "ps aux" },
    MenuEntry { name: "get_ss", shell: "ss -tunap" },
    MenuEntry { name: "get_apt_list", shell: "apt list --installed" },
    MenuEntry { name: "get_services", shell: "systemctl list-units --type=service" },
];

/// Log file read by the `get_repl_logs` command
pub const REPL_LOG_PATH: &str = "/var/log/postgresql/postgresql.log";

/// Looks up the shell string for a diagnostic command name.
#[must_use]
pub fn shell_for(name: &str) -> Option<&'static str> {
    DIAGNOSTIC_MENU
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.shell)
}

/// Reformats raw replication log content line by line under a banner.
#[must_use]
pub fn format_repl_logs(raw: &str) -> String {
    let mut out = format!("Логи репликации ({REPL_LOG_PATH}):\n");
    for line in raw.lines() {
        out.push_str("> ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_has_a_shell_command() {
        for entry in DIAGNOSTIC_MENU {
            assert!(!entry.shell.is_empty(), "empty shell for {}", entry.name);
            assert!(entry.name.starts_with("get_"));
        }
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(shell_for("get_uptime"), Some("uptime"));
        assert_eq!(shell_for("get_df"), Some("df -h"));
        assert_eq!(shell_for("get_critical"), Some("sudo journalctl -p crit"));
        assert_eq!(shell_for("rm_rf"), None);
    }

    #[test]
    fn repl_logs_banner_and_prefix() {
        let formatted = format_repl_logs("line one\nline two");
        let mut lines = formatted.lines();
        assert!(lines.next().is_some_and(|l| l.contains(REPL_LOG_PATH)));
        assert_eq!(lines.next(), Some("> line one"));
        assert_eq!(lines.next(), Some("> line two"));
    }
}
