// commands.rs
// Purpose: the grant/revoke command schema handed to the platform at registration

use serde::{Serialize, Serializer};

use crate::errors::ClearanceResult;
use crate::gate::Action;

/// Option types as numbered by the platform's command API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    User,
    Role,
}

impl OptionKind {
    pub fn code(self) -> u8 {
        match self {
            OptionKind::User => 6,
            OptionKind::Role => 8,
        }
    }
}

impl Serialize for OptionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOption {
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub options: Vec<CommandOption>,
}

impl CommandSpec {
    pub fn for_action(action: Action) -> Self {
        let (description, user_help, role_help) = match action {
            Action::Grant => (
                "Grant a system clearance role to a user.",
                "User to give clearance to",
                "Role to grant",
            ),
            Action::Revoke => (
                "Revoke a system clearance role from a user.",
                "User to revoke clearance from",
                "Role to revoke",
            ),
        };
        Self {
            name: action.command_name(),
            description,
            options: vec![
                CommandOption {
                    kind: OptionKind::User,
                    name: "user",
                    description: user_help,
                    required: true,
                },
                CommandOption {
                    kind: OptionKind::Role,
                    name: "role",
                    description: role_help,
                    required: true,
                },
            ],
        }
    }
}

/// Both commands, in registration order.
pub fn command_set() -> Vec<CommandSpec> {
    vec![
        CommandSpec::for_action(Action::Grant),
        CommandSpec::for_action(Action::Revoke),
    ]
}

/// Registration body for the guild command endpoint.
pub fn registration_payload() -> ClearanceResult<String> {
    Ok(serde_json::to_string_pretty(&command_set())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_commands_require_user_and_role() {
        let commands = command_set();
        let names: Vec<&str> = commands.iter().map(|c| c.name).collect();
        assert_eq!(names, ["grant", "revoke"]);
        for command in &commands {
            assert_eq!(command.options.len(), 2);
            assert!(command.options.iter().all(|o| o.required));
            assert_eq!(command.options[0].name, "user");
            assert_eq!(command.options[1].name, "role");
        }
    }

    #[test]
    fn payload_uses_platform_option_codes() {
        let json: serde_json::Value =
            serde_json::from_str(&registration_payload().unwrap()).unwrap();
        assert_eq!(json[0]["options"][0]["type"], 6);
        assert_eq!(json[0]["options"][1]["type"], 8);
        assert_eq!(json[1]["description"], "Revoke a system clearance role from a user.");
    }
}
