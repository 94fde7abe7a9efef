//! Localization - languages, themes and translated strings

use std::fmt;

use chrono::Weekday;

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    Ru,
    Pl,
}

impl Language {
    pub fn all() -> &'static [Language] {
        &[Language::En, Language::Es, Language::Fr, Language::Ru, Language::Pl]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::Ru => "ru",
            Language::Pl => "pl",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Language::all().iter().copied().find(|l| l.code() == code.trim())
    }

    /// Native name for the settings list
    pub fn label(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Español",
            Language::Fr => "Français",
            Language::Ru => "Русский",
            Language::Pl => "Polski",
        }
    }

    /// First day of the calendar week in this locale
    pub fn week_start(&self) -> Weekday {
        match self {
            Language::En => Weekday::Sun,
            Language::Es | Language::Fr | Language::Ru | Language::Pl => Weekday::Mon,
        }
    }

    pub fn month_name(&self, month: u32) -> &'static str {
        let names: &[&str; 12] = match self {
            Language::En => &[
                "January", "February", "March", "April", "May", "June",
                "July", "August", "September", "October", "November", "December",
            ],
            Language::Es => &[
                "enero", "febrero", "marzo", "abril", "mayo", "junio",
                "julio", "agosto", "septiembre", "octubre", "noviembre", "diciembre",
            ],
            Language::Fr => &[
                "janvier", "février", "mars", "avril", "mai", "juin",
                "juillet", "août", "septembre", "octobre", "novembre", "décembre",
            ],
            Language::Ru => &[
                "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь",
                "Июль", "Август", "Сентябрь", "Октябрь", "Ноябрь", "Декабрь",
            ],
            Language::Pl => &[
                "styczeń", "luty", "marzec", "kwiecień", "maj", "czerwiec",
                "lipiec", "sierpień", "wrzesień", "październik", "listopad", "grudzień",
            ],
        };
        names[(month.clamp(1, 12) - 1) as usize]
    }

    /// Single-letter weekday label for the calendar header
    pub fn weekday_letter(&self, day: Weekday) -> &'static str {
        let letters: &[&str; 7] = match self {
            Language::En => &["M", "T", "W", "T", "F", "S", "S"],
            Language::Es => &["L", "M", "X", "J", "V", "S", "D"],
            Language::Fr => &["L", "M", "M", "J", "V", "S", "D"],
            Language::Ru => &["П", "В", "С", "Ч", "П", "С", "В"],
            Language::Pl => &["P", "W", "Ś", "C", "P", "S", "N"],
        };
        letters[day.num_days_from_monday() as usize]
    }

    pub fn strings(&self) -> &'static Strings {
        match self {
            Language::En => &EN,
            Language::Es => &ES,
            Language::Fr => &FR,
            Language::Ru => &RU,
            Language::Pl => &PL,
        }
    }

    /// Translate a block or exercise key, the key itself when unknown
    pub fn translate<'a>(&self, key: &'a str) -> &'a str {
        let s = self.strings();
        match key {
            "b1Name" => s.b1_name,
            "b2Name" => s.b2_name,
            "b3Name" => s.b3_name,
            "bicepCurls" => s.bicep_curls,
            "frenchPress" => s.french_press,
            "militaryPress" => s.military_press,
            "reverseCurls" => s.reverse_curls,
            "uprightRow" => s.upright_row,
            "wristCurls" => s.wrist_curls,
            other => other,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.trim() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Translated interface strings
pub struct Strings {
    pub today: &'static str,
    pub cancel: &'static str,
    pub settings: &'static str,
    pub language: &'static str,
    pub theme: &'static str,
    pub dark: &'static str,
    pub light: &'static str,
    pub total_sessions: &'static str,
    pub rest_today: &'static str,
    pub workout: &'static str,
    pub rest: &'static str,
    pub block: &'static str,
    pub preparation: &'static str,
    pub previous: &'static str,
    pub weight: &'static str,
    pub reps: &'static str,
    pub set: &'static str,
    pub loading_tip: &'static str,
    pub session_complete: &'static str,
    pub start_training: &'static str,
    pub hold_to_delete: &'static str,
    pub deleting_data: &'static str,
    pub securing_data: &'static str,
    pub safety_hold_required: &'static str,
    pub safety_info: &'static str,
    pub stop_workout: &'static str,
    pub get_ready: &'static str,
    pub b1_name: &'static str,
    pub b2_name: &'static str,
    pub b3_name: &'static str,
    pub bicep_curls: &'static str,
    pub french_press: &'static str,
    pub military_press: &'static str,
    pub reverse_curls: &'static str,
    pub upright_row: &'static str,
    pub wrist_curls: &'static str,
}

const EN: Strings = Strings {
    today: "Today",
    cancel: "Cancel",
    settings: "Settings",
    language: "Language",
    theme: "Theme",
    dark: "Dark",
    light: "Light",
    total_sessions: "Total sessions",
    rest_today: "Rest today",
    workout: "Workout",
    rest: "Rest",
    block: "Block",
    preparation: "Preparation for",
    previous: "Previous values loaded",
    weight: "Weight",
    reps: "Reps",
    set: "Set",
    loading_tip: "Loading coach tip...",
    session_complete: "Session complete. Great work!",
    start_training: "Start training",
    hold_to_delete: "Hold to delete this session",
    deleting_data: "Deleting",
    securing_data: "Saving",
    safety_hold_required: "Hold for 3 seconds",
    safety_info: "Hold the button to finish and save the session",
    stop_workout: "Stop the workout? Progress will be lost.",
    get_ready: "Get ready",
    b1_name: "Arms",
    b2_name: "Shoulders & Forearms",
    b3_name: "Traps & Wrists",
    bicep_curls: "Bicep curls",
    french_press: "French press",
    military_press: "Military press",
    reverse_curls: "Reverse curls",
    upright_row: "Upright row",
    wrist_curls: "Wrist curls",
};

const ES: Strings = Strings {
    today: "Hoy",
    cancel: "Cancelar",
    settings: "Ajustes",
    language: "Idioma",
    theme: "Tema",
    dark: "Oscuro",
    light: "Claro",
    total_sessions: "Sesiones totales",
    rest_today: "Descanso hoy",
    workout: "Entreno",
    rest: "Descanso",
    block: "Bloque",
    preparation: "Preparación para",
    previous: "Valores anteriores cargados",
    weight: "Peso",
    reps: "Reps",
    set: "Serie",
    loading_tip: "Cargando consejo...",
    session_complete: "Sesión completada. ¡Buen trabajo!",
    start_training: "Empezar entrenamiento",
    hold_to_delete: "Mantén para borrar esta sesión",
    deleting_data: "Borrando",
    securing_data: "Guardando",
    safety_hold_required: "Mantén 3 segundos",
    safety_info: "Mantén el botón para terminar y guardar la sesión",
    stop_workout: "¿Detener el entrenamiento? Se perderá el progreso.",
    get_ready: "Prepárate",
    b1_name: "Brazos",
    b2_name: "Hombros y antebrazos",
    b3_name: "Trapecios y muñecas",
    bicep_curls: "Curl de bíceps",
    french_press: "Press francés",
    military_press: "Press militar",
    reverse_curls: "Curl inverso",
    upright_row: "Remo al mentón",
    wrist_curls: "Curl de muñeca",
};

const FR: Strings = Strings {
    today: "Aujourd'hui",
    cancel: "Annuler",
    settings: "Paramètres",
    language: "Langue",
    theme: "Thème",
    dark: "Sombre",
    light: "Clair",
    total_sessions: "Séances totales",
    rest_today: "Repos aujourd'hui",
    workout: "Séance",
    rest: "Repos",
    block: "Bloc",
    preparation: "Préparation pour",
    previous: "Valeurs précédentes chargées",
    weight: "Poids",
    reps: "Rép.",
    set: "Série",
    loading_tip: "Chargement du conseil...",
    session_complete: "Séance terminée. Bravo !",
    start_training: "Commencer l'entraînement",
    hold_to_delete: "Maintenir pour supprimer la séance",
    deleting_data: "Suppression",
    securing_data: "Enregistrement",
    safety_hold_required: "Maintenir 3 secondes",
    safety_info: "Maintenez le bouton pour terminer et enregistrer la séance",
    stop_workout: "Arrêter l'entraînement ? La progression sera perdue.",
    get_ready: "Préparez-vous",
    b1_name: "Bras",
    b2_name: "Épaules et avant-bras",
    b3_name: "Trapèzes et poignets",
    bicep_curls: "Curl biceps",
    french_press: "Barre au front",
    military_press: "Développé militaire",
    reverse_curls: "Curl inversé",
    upright_row: "Tirage menton",
    wrist_curls: "Curl poignets",
};

const RU: Strings = Strings {
    today: "Сегодня",
    cancel: "Отмена",
    settings: "Настройки",
    language: "Язык",
    theme: "Тема",
    dark: "Тёмная",
    light: "Светлая",
    total_sessions: "Всего тренировок",
    rest_today: "Отдых сегодня",
    workout: "Тренировка",
    rest: "Отдых",
    block: "Блок",
    preparation: "Подготовка на",
    previous: "Загружены прошлые значения",
    weight: "Вес",
    reps: "Повт.",
    set: "Подход",
    loading_tip: "Загрузка совета...",
    session_complete: "Тренировка завершена. Отличная работа!",
    start_training: "Начать тренировку",
    hold_to_delete: "Удерживайте, чтобы удалить тренировку",
    deleting_data: "Удаление",
    securing_data: "Сохранение",
    safety_hold_required: "Удерживайте 3 секунды",
    safety_info: "Удерживайте кнопку, чтобы завершить и сохранить тренировку",
    stop_workout: "Прервать тренировку? Прогресс будет потерян.",
    get_ready: "Приготовьтесь",
    b1_name: "Руки",
    b2_name: "Плечи и предплечья",
    b3_name: "Трапеции и запястья",
    bicep_curls: "Сгибания на бицепс",
    french_press: "Французский жим",
    military_press: "Армейский жим",
    reverse_curls: "Обратные сгибания",
    upright_row: "Тяга к подбородку",
    wrist_curls: "Сгибания запястий",
};

const PL: Strings = Strings {
    today: "Dziś",
    cancel: "Anuluj",
    settings: "Ustawienia",
    language: "Język",
    theme: "Motyw",
    dark: "Ciemny",
    light: "Jasny",
    total_sessions: "Wszystkie treningi",
    rest_today: "Odpoczynek dziś",
    workout: "Trening",
    rest: "Odpoczynek",
    block: "Blok",
    preparation: "Przygotowanie na",
    previous: "Wczytano poprzednie wartości",
    weight: "Ciężar",
    reps: "Powt.",
    set: "Seria",
    loading_tip: "Ładowanie wskazówki...",
    session_complete: "Trening ukończony. Świetna robota!",
    start_training: "Rozpocznij trening",
    hold_to_delete: "Przytrzymaj, aby usunąć trening",
    deleting_data: "Usuwanie",
    securing_data: "Zapisywanie",
    safety_hold_required: "Przytrzymaj 3 sekundy",
    safety_info: "Przytrzymaj przycisk, aby zakończyć i zapisać trening",
    stop_workout: "Przerwać trening? Postęp zostanie utracony.",
    get_ready: "Przygotuj się",
    b1_name: "Ramiona",
    b2_name: "Barki i przedramiona",
    b3_name: "Kaptury i nadgarstki",
    bicep_curls: "Uginanie na biceps",
    french_press: "Wyciskanie francuskie",
    military_press: "Wyciskanie żołnierskie",
    reverse_curls: "Uginanie nachwytem",
    upright_row: "Podciąganie sztangi wzdłuż tułowia",
    wrist_curls: "Uginanie nadgarstków",
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::all_blocks;

    #[test]
    fn test_language_codes_round_trip() {
        for lang in Language::all() {
            assert_eq!(Language::from_code(lang.code()), Some(*lang));
        }
        assert_eq!(Language::from_code("de"), None);
    }

    #[test]
    fn test_week_start_by_locale() {
        assert_eq!(Language::En.week_start(), Weekday::Sun);
        assert_eq!(Language::Ru.week_start(), Weekday::Mon);
        assert_eq!(Language::Pl.week_start(), Weekday::Mon);
    }

    #[test]
    fn test_every_block_key_is_translated() {
        for lang in Language::all() {
            for block in all_blocks() {
                assert_ne!(lang.translate(block.name), block.name, "{} missing {}", lang, block.name);
                for ex in block.exercises {
                    assert_ne!(lang.translate(ex), *ex, "{} missing {}", lang, ex);
                }
            }
        }
    }

    #[test]
    fn test_translate_unknown_key_returns_key() {
        assert_eq!(Language::Fr.translate("deadlift"), "deadlift");
    }

    #[test]
    fn test_month_and_weekday_names() {
        assert_eq!(Language::En.month_name(3), "March");
        assert_eq!(Language::Es.month_name(12), "diciembre");
        assert_eq!(Language::En.weekday_letter(Weekday::Sun), "S");
        assert_eq!(Language::Pl.weekday_letter(Weekday::Sun), "N");
    }

    #[test]
    fn test_theme_parse_and_toggle() {
        assert_eq!(Theme::from_str_opt("light"), Some(Theme::Light));
        assert_eq!(Theme::from_str_opt("blue"), None);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::default(), Theme::Dark);
    }
}
