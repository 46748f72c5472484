use std::str::FromStr;

use crate::bot::games::Choice;

/* Session payloads are the routing keys embedded in interactive components.
 * On the wire they are strings shaped as <feature>:<session-id>[:<args>],
 * but the rest of the bot only ever sees this typed form: the dispatcher
 * parses and validates the string once, at the router boundary, and a
 * malformed payload never reaches a handler.
 */

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("unknown component feature: {0}")]
    UnknownFeature(String),
    #[error("malformed component payload: {0}")]
    Malformed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ComponentId {
    PollVote { poll_id: String, option: usize },
    GameMove { game_id: String, cell: usize },
    RpsChoice { challenger: u64, opponent: u64, choice: Choice },
    GiveawayJoin { giveaway_id: String },
    Suggestion { session_id: String },
}

impl ComponentId {
    /* Renders the payload into the string carried by the component. */
    pub fn encode(&self) -> String {
        match self {
            ComponentId::PollVote { poll_id, option } => format!("poll:{}:{}", poll_id, option),
            ComponentId::GameMove { game_id, cell } => format!("ttt:{}:{}", game_id, cell),
            ComponentId::RpsChoice {
                challenger,
                opponent,
                choice,
            } => format!("rps:{}:{}:{}", challenger, opponent, choice.as_str()),
            ComponentId::GiveawayJoin { giveaway_id } => format!("giveaway:{}", giveaway_id),
            ComponentId::Suggestion { session_id } => format!("suggest:{}", session_id),
        }
    }

    /* Parses a raw component identifier back into a typed payload. */
    pub fn parse(raw: &str) -> Result<ComponentId, SessionError> {
        let parts: Vec<&str> = raw.split(':').collect();

        match parts.as_slice() {
            ["poll", poll_id, option] if !poll_id.is_empty() => {
                let option = option
                    .parse::<usize>()
                    .map_err(|_| SessionError::Malformed(raw.to_string()))?;
                Ok(ComponentId::PollVote {
                    poll_id: poll_id.to_string(),
                    option,
                })
            }
            ["ttt", game_id, cell] if !game_id.is_empty() => {
                let cell = cell
                    .parse::<usize>()
                    .map_err(|_| SessionError::Malformed(raw.to_string()))?;
                if cell >= 9 {
                    return Err(SessionError::Malformed(raw.to_string()));
                }
                Ok(ComponentId::GameMove {
                    game_id: game_id.to_string(),
                    cell,
                })
            }
            ["rps", challenger, opponent, choice] => {
                let challenger = challenger
                    .parse::<u64>()
                    .map_err(|_| SessionError::Malformed(raw.to_string()))?;
                let opponent = opponent
                    .parse::<u64>()
                    .map_err(|_| SessionError::Malformed(raw.to_string()))?;
                let choice = Choice::from_str(choice)
                    .map_err(|_| SessionError::Malformed(raw.to_string()))?;
                Ok(ComponentId::RpsChoice {
                    challenger,
                    opponent,
                    choice,
                })
            }
            ["giveaway", giveaway_id] if !giveaway_id.is_empty() => {
                Ok(ComponentId::GiveawayJoin {
                    giveaway_id: giveaway_id.to_string(),
                })
            }
            ["suggest", session_id] if !session_id.is_empty() => Ok(ComponentId::Suggestion {
                session_id: session_id.to_string(),
            }),
            [feature, ..] if !matches!(*feature, "poll" | "ttt" | "rps" | "giveaway" | "suggest") => {
                Err(SessionError::UnknownFeature(feature.to_string()))
            }
            _ => Err(SessionError::Malformed(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips() {
        let payloads = vec![
            ComponentId::PollVote {
                poll_id: "a1b2".to_string(),
                option: 2,
            },
            ComponentId::GameMove {
                game_id: "g7".to_string(),
                cell: 8,
            },
            ComponentId::RpsChoice {
                challenger: 111,
                opponent: 222,
                choice: Choice::Scissors,
            },
            ComponentId::GiveawayJoin {
                giveaway_id: "gw-1".to_string(),
            },
            ComponentId::Suggestion {
                session_id: "s9".to_string(),
            },
        ];

        for payload in payloads {
            assert_eq!(ComponentId::parse(&payload.encode()), Ok(payload));
        }
    }

    #[test]
    fn test_rejects_unknown_feature() {
        assert_eq!(
            ComponentId::parse("karma:123"),
            Err(SessionError::UnknownFeature("karma".to_string()))
        );
    }

    #[test]
    fn test_rejects_malformed_payloads() {
        // Missing arguments
        assert!(ComponentId::parse("poll:abc").is_err());
        // Non-numeric option index
        assert!(ComponentId::parse("poll:abc:first").is_err());
        // Cell off the board
        assert!(ComponentId::parse("ttt:abc:9").is_err());
        // Unknown choice token
        assert!(ComponentId::parse("rps:1:2:lizard").is_err());
        // Empty session id
        assert!(ComponentId::parse("giveaway:").is_err());
        assert!(ComponentId::parse("").is_err());
    }
}
