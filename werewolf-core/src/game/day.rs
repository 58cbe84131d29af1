//! Day protocol: discussion, voting, elimination.

use super::{relay, scene, Game};
use crate::events::EventKind;
use crate::generation::Relay;
use crate::tally::{Ballot, Tally};
use tracing::{debug, info, warn};

impl Game {
    /// Play one day. Does not check for a winner or advance the round.
    pub async fn run_day(&mut self) {
        info!(round = self.round + 1, alive = self.alive.len(), "day phase started");
        self.bus.phase("Day Phase Started");

        self.discussion().await;
        self.voting().await;

        self.bus.phase("Day Phase Ended");
    }

    /// Roster indices of living players, in roster order.
    fn living_players(&self) -> Vec<usize> {
        self.participants
            .iter()
            .enumerate()
            .filter(|(_, p)| self.is_alive(p.name()))
            .map(|(i, _)| i)
            .collect()
    }

    /// The first few living players think aloud and then speak.
    async fn discussion(&mut self) {
        let speakers: Vec<usize> = self
            .living_players()
            .into_iter()
            .take(self.config.discussion_speakers)
            .collect();

        let intro = self.scene_intro();
        let scene = scene(self.round, &intro);

        for i in speakers {
            let context = format!(
                "Alive players: {}. Discuss who might be the werewolf.",
                self.alive.join(", ")
            );
            let speaker = &mut self.participants[i];
            debug!(speaker = %speaker.name(), "discussion turn");

            self.bus.emit(EventKind::Thought, speaker.name(), "[Thinking...]");
            speaker.think(scene, &context, Relay::Live(&self.bus)).await;
            speaker.speak(scene, &context, Relay::Live(&self.bus)).await;

            self.pace(self.config.pacing.speaker_delay()).await;
        }
    }

    /// Every living player votes once, blind to the others' votes.
    async fn voting(&mut self) {
        self.bus.system("Voting phase started.");

        let voters = self.living_players();
        let context = format!(
            "Alive players: {}. Based on today's discussion, who should be eliminated?",
            self.alive.join(", ")
        );
        let intro = self.scene_intro();
        let scene = scene(self.round, &intro);
        let bus = self.decision_bus();

        let mut ballots = Vec::with_capacity(voters.len());
        for i in voters {
            let vote = self.participants[i]
                .vote(scene, &context, relay(&bus))
                .await;
            let ballot = Ballot::new(self.participants[i].name(), vote);

            self.bus.emit(
                EventKind::Action,
                &ballot.voter,
                format!("Voted for {}", ballot.target),
            );
            ballots.push(ballot);
            self.pace(self.config.pacing.action_delay()).await;
        }

        let tally = Tally::from_ballots(&ballots);
        let Some(candidate) = tally.winner().map(str::to_string) else {
            return;
        };
        debug!(%candidate, votes = tally.count_for(&candidate), "day vote tallied");

        if self.eliminate(&candidate) {
            self.announce(&format!("By majority vote, {candidate} has been eliminated."))
                .await;
        } else {
            warn!(%candidate, "vote target is not alive");
            self.bus
                .system(format!("Invalid vote target: {candidate}. No elimination."));
        }
    }
}
