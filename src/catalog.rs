// src/catalog.rs

//! Read-only reference data: the problem catalog, interview personas and the
//! one-time Design Thinking assessment quiz.

use std::collections::BTreeMap;

use crate::models::problem::{Persona, Problem};

pub fn problems() -> Vec<Problem> {
    vec![
        Problem {
            id: 1,
            title: "Reduce Load Shedding's Impact on School Learning".to_string(),
            context: "As Eskom continues with Stage 2-4 load shedding in 2025, schools across \
                SA, from Johannesburg's urban hubs to rural Limpopo villages, face disrupted \
                lessons, with no power for lights, computers, or fans during hot summers. In \
                quintile 1 schools, generators are rare due to budget cuts, leading to canceled \
                classes and learners falling behind in STEM subjects. The 2025 Basic Education \
                Amendment Bill aims to address infrastructure, but immediate solutions are \
                needed to keep education flowing."
                .to_string(),
            key_challenges: vec![
                "Frequent blackouts (up to 8 hours daily) halting online learning and homework."
                    .to_string(),
                "Health risks from studying in dark, hot classrooms, worsening absenteeism."
                    .to_string(),
                "Digital divide: Wealthier schools have solar backups, while poorer ones rely on candles."
                    .to_string(),
            ],
            category: "High School".to_string(),
            difficulty: "Fun & Easy".to_string(),
            image: None,
        },
        Problem {
            id: 2,
            title: "Address Water Shortages in School Facilities".to_string(),
            context: "Ongoing droughts and infrastructure failures in provinces like the \
                Eastern Cape and Western Cape leave schools without running water for days, \
                forcing learners to share buckets or go home early. In 2025, with climate \
                change worsening, quintile 1-3 schools in townships like Khayelitsha face \
                hygiene issues, increasing absenteeism from illnesses. Government initiatives \
                like the 2025 Water Infrastructure Fund aim to install boreholes, but creative, \
                low-cost solutions are urgent for clean toilets and drinking water."
                .to_string(),
            key_challenges: vec![
                "Health risks from poor sanitation, leading to outbreaks like cholera in affected areas."
                    .to_string(),
                "Gender impacts: Girls miss school during periods due to no water for hygiene."
                    .to_string(),
                "Resource strain: Teachers buy bottled water, stretching tight budgets."
                    .to_string(),
            ],
            category: "High School".to_string(),
            difficulty: "Fun & Easy".to_string(),
            image: None,
        },
        Problem {
            id: 3,
            title: "Improve Safety During School Commutes".to_string(),
            context: "With rising crime rates in 2025 (e.g., Gauteng's taxi violence and \
                muggings in Cape Flats), learners face dangers walking or using minibus taxis \
                to school. Rural kids in Mpumalanga trek long distances on unsafe roads, while \
                urban ones deal with overcrowded transport. The government's Safe Schools \
                Programme has added patrols, but community-driven ideas are needed to reduce \
                assaults and accidents."
                .to_string(),
            key_challenges: vec![
                "Physical dangers like assaults on foot or reckless taxi driving.".to_string(),
                "Long, tiring commutes cutting into study and sleep time.".to_string(),
                "Cost barriers: Safe transport options are unaffordable for many families."
                    .to_string(),
            ],
            category: "High School".to_string(),
            difficulty: "Fun & Easy".to_string(),
            image: None,
        },
    ]
}

pub fn personas() -> Vec<Persona> {
    vec![
        Persona {
            id: 1,
            name: "Lerato".to_string(),
            role: "Rural Learner".to_string(),
            avatar: "assets/stressed-female.png".to_string(),
            backstory: "Lerato is a 16-year-old Grade 11 girl from a rural village in \
                Limpopo, where load shedding hits up to 8 hours daily, forcing her to study by \
                candlelight or her phone's torch, which drains her limited data bundle. With \
                Eskom's Stage 2-4 outages persisting in 2025, she often misses online homework \
                submissions, and the heat from no fans makes focusing impossible, leading to \
                headaches and lower marks. Her family can't afford solar lights, so she shares \
                a single torch with siblings, dreaming of a future in nursing but worried power \
                issues will derail her matric."
                .to_string(),
        },
        Persona {
            id: 2,
            name: "Mr. Dlamini".to_string(),
            role: "Overworked Teacher".to_string(),
            avatar: "assets/stressed-male.png".to_string(),
            backstory: "Mr. Dlamini, a 45-year-old Zulu educator from a KwaZulu-Natal \
                township school, has taught for 20 years but now loses hours to blackouts, \
                scrambling to adapt lessons without projectors or computers. In 2025, with \
                teacher shortages worsening, he handles oversized classes of 50+ learners, and \
                power cuts mean no aircon in sweltering heat, causing fatigue for everyone. \
                He's seen dropout rates rise as kids lose motivation, and his own health \
                suffers from stress, pushing him toward early retirement despite his passion \
                for history."
                .to_string(),
        },
    ]
}

/// Title of a catalog problem, if the id is known.
pub fn problem_title(id: i64) -> Option<String> {
    problems().into_iter().find(|p| p.id == id).map(|p| p.title)
}

/// One multiple-choice question of the assessment quiz.
#[derive(Debug, Clone)]
pub struct QuizQuestion {
    pub id: u32,
    pub phase: &'static str,
    pub question: &'static str,
    pub options: [&'static str; 4],
    pub correct_answer: &'static str,
    pub rationale: &'static str,
}

pub fn quiz() -> Vec<QuizQuestion> {
    vec![
        QuizQuestion {
            id: 1,
            phase: "Phase 1: Empathize (Understanding the Human)",
            question: "Your team needs to understand why students hit the snooze button. \
                Which research method will give you the deepest qualitative insight?",
            options: [
                "a) Creating a Google Form survey asking 'How many times do you hit snooze?' sent to the whole school.",
                "b) Interviewing 5 students and asking them to walk you through their morning routine step-by-step.",
                "c) Researching sleep cycles and circadian rhythms online.",
                "d) Asking the school nurse for data on late arrivals.",
            ],
            correct_answer: "b",
            rationale: "Design thinking relies on 'Why,' not 'How many.' Surveys give \
                numbers; interviews give stories and emotions, which are necessary for empathy.",
        },
        QuizQuestion {
            id: 2,
            phase: "Phase 1: Empathize (Understanding the Human)",
            question: "You are interviewing a student named Marcus. You want to know about \
                his phone usage at night. Which of these is a BIASED (leading) question that \
                you should AVOID?",
            options: [
                "a) 'Walk me through the last hour before you went to sleep.'",
                "b) 'Where do you keep your phone while you sleep?'",
                "c) 'Don't you think using your phone at night is ruining your sleep?'",
                "d) 'How do you feel when you wake up and see notifications?'",
            ],
            correct_answer: "c",
            rationale: "Option C imposes your opinion ('ruining your sleep') onto the user. \
                Good research questions are neutral and open-ended.",
        },
        QuizQuestion {
            id: 3,
            phase: "Phase 2: Define (Framing the Problem)",
            question: "You need to write a Problem Statement (Point of View) for Marcus. \
                Which of these follows the correct 'User + Need + Insight' structure?",
            options: [
                "a) 'We need to invent a vibrating pillow alarm.'",
                "b) 'High schools should start at 10:00 AM so kids can sleep.'",
                "c) 'Marcus needs a way to disconnect from his social life at night without feeling lonely, because his FOMO (Fear Of Missing Out) keeps him awake.'",
                "d) 'Teenagers need more sleep because science says they need 9 hours.'",
            ],
            correct_answer: "c",
            rationale: "This is the only option that combines a specific user, a verb (need), \
                and the deep reason why ('Insight'). Option A is a solution, B is a policy, D \
                is a fact.",
        },
        QuizQuestion {
            id: 4,
            phase: "Phase 2: Define (Framing the Problem)",
            question: "Your teammate suggests this Problem Statement: 'How might we build an \
                app that locks Marcus's phone?' Why is this a WEAK statement?",
            options: [
                "a) It is too specific.",
                "b) It focuses on the user.",
                "c) It embeds the solution (an app) into the problem, restricting creativity.",
                "d) It is too emotional.",
            ],
            correct_answer: "c",
            rationale: "Good HMW statements stay solution-agnostic; baking 'an app' into the \
                problem closes off every non-app answer before ideation starts.",
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizResult {
    pub correct_count: usize,
    pub total_questions: usize,
    pub score: i64,
    /// Completion is what unlocks the stage routes; a low score still counts.
    pub completed: bool,
}

/// Grade a set of quiz answers (question id -> chosen option key).
pub fn evaluate_quiz(answers: &BTreeMap<u32, String>) -> QuizResult {
    let questions = quiz();
    let total_questions = questions.len();

    let correct_count = questions
        .iter()
        .filter(|q| answers.get(&q.id).is_some_and(|a| a == q.correct_answer))
        .count();

    let score = if total_questions == 0 {
        0
    } else {
        ((correct_count as f64 / total_questions as f64) * 100.0).round() as i64
    };

    QuizResult {
        correct_count,
        total_questions,
        score,
        completed: true,
    }
}
