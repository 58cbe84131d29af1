//! Prompt templates.
//!
//! Personas and per-step prompts in English and Chinese. Step prompts are
//! framed with the round number, the speaker's name and a short game
//! introduction so every call stands on its own.

use crate::participant::Role;
use serde::{Deserialize, Serialize};

/// Prompt language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

/// Per-call framing shared by every step prompt.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// 1-based round currently being played.
    pub round: u32,
    pub player_name: &'a str,
    pub intro: &'a str,
}

/// A decision a participant can be asked to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Kill,
    Investigate,
    Potion,
    Vote,
}

impl Task {
    fn description(&self, language: Language) -> &'static str {
        match (self, language) {
            (Task::Kill, Language::En) => "Choose one player to eliminate tonight.",
            (Task::Kill, Language::Zh) => "选择今晚要淘汰的一名玩家。",
            (Task::Investigate, Language::En) => "Choose one player to check their identity.",
            (Task::Investigate, Language::Zh) => "选择一名玩家查验其身份。",
            (Task::Potion, Language::En) => {
                "Decide potion usage: Save victim, Poison someone, or Pass."
            }
            (Task::Potion, Language::Zh) => "决定药水的使用：救活受害者、毒杀某人，或者跳过。",
            (Task::Vote, Language::En) => {
                "Vote to eliminate one player you believe is a werewolf."
            }
            (Task::Vote, Language::Zh) => "投票淘汰一名你认为是狼人的玩家。",
        }
    }

    fn instruction(&self, language: Language) -> &'static str {
        match (self, language) {
            (Task::Potion, Language::En) => {
                "Output format: 'SAVE' or 'POISON <Name>' or 'PASS'. Output ONLY the decision."
            }
            (Task::Potion, Language::Zh) => {
                "输出格式：'SAVE' 或 'POISON <名字>' 或 'PASS'。只输出决定。"
            }
            (_, Language::En) => "Output ONLY the player's name. No other text.",
            (_, Language::Zh) => "只输出玩家的名字。不要其他文字。",
        }
    }
}

/// Template set for one language.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prompts {
    language: Language,
}

impl Prompts {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// System persona for a role.
    pub fn persona(&self, role: Role) -> &'static str {
        match self.language {
            Language::En => match role {
                Role::Narrator => NARRATOR_EN,
                Role::Werewolf => WEREWOLF_EN,
                Role::Seer => SEER_EN,
                Role::Witch => WITCH_EN,
                Role::Villager => VILLAGER_EN,
            },
            Language::Zh => match role {
                Role::Narrator => NARRATOR_ZH,
                Role::Werewolf => WEREWOLF_ZH,
                Role::Seer => SEER_ZH,
                Role::Witch => WITCH_ZH,
                Role::Villager => VILLAGER_ZH,
            },
        }
    }

    /// One-line description of the table, shared by every player.
    pub fn game_intro(&self, players: &[String]) -> String {
        match self.language {
            Language::En => format!(
                "This is a game of Werewolf with {} players: {}.",
                players.len(),
                players.join(", ")
            ),
            Language::Zh => format!(
                "这是一局{}人的狼人杀游戏，玩家有：{}。",
                players.len(),
                players.join("、")
            ),
        }
    }

    pub fn think(&self, frame: Frame<'_>, context: &str) -> String {
        let header = self.header(frame);
        match self.language {
            Language::En => format!(
                "{header}Context: {context}\n\n\
                 Analyze the situation carefully. Consider:\n\
                 - Who appears suspicious and why?\n\
                 - What is your strategic approach?\n\
                 - What information can you deduce?\n\n\
                 Keep your analysis concise and focused."
            ),
            Language::Zh => format!(
                "{header}情境：{context}\n\n\
                 仔细分析局势。思考：\n\
                 - 谁看起来可疑？为什么？\n\
                 - 你的策略是什么？\n\
                 - 你能推断出什么信息？\n\n\
                 保持分析简洁、专注。"
            ),
        }
    }

    pub fn speak(&self, frame: Frame<'_>, context: &str, thought: &str) -> String {
        let header = self.header(frame);
        match self.language {
            Language::En => format!(
                "{header}Context: {context}\n\
                 Your Reasoning: {thought}\n\n\
                 Speak to other players. You may:\n\
                 - Defend yourself from accusations\n\
                 - Accuse suspicious players\n\
                 - Share observations\n\n\
                 Be concise and strategic. Limit: 30 words."
            ),
            Language::Zh => format!(
                "{header}情境：{context}\n\
                 你的推理：{thought}\n\n\
                 对其他玩家发言。你可以：\n\
                 - 为自己辩护\n\
                 - 指控可疑玩家\n\
                 - 分享观察\n\n\
                 简洁而有策略。限制：30字内。"
            ),
        }
    }

    pub fn act_think(&self, frame: Frame<'_>, context: &str, task: Task) -> String {
        let header = self.header(frame);
        let task = task.description(self.language);
        match self.language {
            Language::En => format!(
                "{header}Context: {context}\n\
                 Task: {task}\n\n\
                 Analyze the situation thoroughly. What is the best course of action and why?\n\
                 Provide your strategic reasoning."
            ),
            Language::Zh => format!(
                "{header}情境：{context}\n\
                 任务：{task}\n\n\
                 全面分析局势。最佳行动方案是什么？为什么？\n\
                 提供你的战略推理。"
            ),
        }
    }

    pub fn act_decide(&self, frame: Frame<'_>, context: &str, thought: &str, task: Task) -> String {
        let header = self.header(frame);
        let instruction = task.instruction(self.language);
        let task = task.description(self.language);
        match self.language {
            Language::En => format!(
                "{header}Context: {context}\n\
                 Your Reasoning: {thought}\n\n\
                 Task: {task}\n\
                 Instruction: {instruction}"
            ),
            Language::Zh => format!(
                "{header}情境：{context}\n\
                 你的推理：{thought}\n\n\
                 任务：{task}\n\
                 指令：{instruction}"
            ),
        }
    }

    pub fn announce(&self, message: &str) -> String {
        match self.language {
            Language::En => format!(
                "Task: Announce the following event to the players and audience.\n\
                 Event: {message}\n\
                 Style: Cryptic, mechanical, dramatic.\n\
                 Keep it under 2 sentences."
            ),
            Language::Zh => format!(
                "任务：向玩家和观众宣布以下事件。\n\
                 事件：{message}\n\
                 风格：神秘、机械化、戏剧性。\n\
                 限制：2句话以内。"
            ),
        }
    }

    fn header(&self, frame: Frame<'_>) -> String {
        match self.language {
            Language::En => format!(
                "Round {}. {}\nYou are {}.\n\n",
                frame.round, frame.intro, frame.player_name
            ),
            Language::Zh => format!(
                "第{}轮。{}\n你是{}。\n\n",
                frame.round, frame.intro, frame.player_name
            ),
        }
    }
}

const NARRATOR_EN: &str = "You are the Game Master of a Werewolf game. Your role is to narrate events with dramatic flair and maintain mystery.
Guide the game flow, announce deaths, and create atmospheric tension. Stay neutral and omniscient.";

const WEREWOLF_EN: &str = "You are a player in a Werewolf game. You must:
- Disguise your true nature and blend in with villagers
- Coordinate with your wolf pack to eliminate threats
- Avoid drawing suspicion during day discussions
- Think strategically about who to target at night";

const SEER_EN: &str = "You are a player in a Werewolf game. You have the power to check one player's identity each night.
- Use your knowledge wisely without revealing your role too early
- Guide village discussions subtly based on your findings
- Identify werewolves through deduction and investigation";

const WITCH_EN: &str = "You are a player in a Werewolf game. You possess two potions:
- Antidote: Save the night's victim
- Poison: Kill any player
Use your potions strategically. Timing is crucial.";

const VILLAGER_EN: &str = "You are a player in a Werewolf game. Though you have no special powers:
- Use logic and observation to identify werewolves
- Participate actively in discussions
- Vote wisely to eliminate threats";

const NARRATOR_ZH: &str = "你是狼人杀游戏的上帝。你的职责是：
- 用戏剧化的方式叙述事件，营造神秘氛围
- 引导游戏流程，宣布死亡，制造紧张感
- 保持中立和全知视角";

const WEREWOLF_ZH: &str = "你是狼人杀游戏中的一名玩家。你必须：
- 伪装真实身份，融入村民
- 与狼队协调，消灭威胁
- 在白天讨论中避免引起怀疑
- 战略性地选择夜晚目标";

const SEER_ZH: &str = "你是狼人杀游戏中的一名玩家。你每晚可以查验一名玩家的身份。
- 明智地运用你的知识，不要过早暴露身份
- 根据发现巧妙引导村民讨论
- 通过推理和调查识别狼人";

const WITCH_ZH: &str = "你是狼人杀游戏中的一名玩家。你拥有两瓶药水：
- 解药：救活夜晚的受害者
- 毒药：杀死任何玩家
战略性地使用药水。时机至关重要。";

const VILLAGER_ZH: &str = "你是狼人杀游戏中的一名玩家。虽然你没有特殊能力：
- 运用逻辑和观察识别狼人
- 积极参与讨论
- 明智投票，消灭威胁";
