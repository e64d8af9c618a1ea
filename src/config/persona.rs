use serde::{ Deserialize, Serialize };
use std::fs;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("Failed to read persona file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse persona file '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One local-reply rule: a case-insensitive pattern tested against the
/// lower-cased message, and the canned reply it yields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FallbackRule {
    pub pattern: String,
    pub reply: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueHours {
    pub lunes_viernes: String,
    pub sabados: String,
    pub domingos: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VenueContact {
    pub whatsapp: String,
    pub email: String,
}

/// Business facts served by `GET /api/info`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VenueInfo {
    pub nombre: String,
    pub descripcion: String,
    pub horarios: VenueHours,
    pub contacto: VenueContact,
    pub servicios: Vec<String>,
}

/// Persona and business copy for one deployment. Loaded once at startup and
/// never mutated; every piece of customer-facing text lives here rather
/// than in code, so a venue swaps the whole file instead of patching
/// handlers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Priming text sent as the first provider turn.
    pub system_context: String,
    /// Canned acknowledgement attributed to the model right after priming.
    pub primer_ack: String,
    pub venue: VenueInfo,
    /// Ordered rule table for local replies. First match wins.
    pub rules: Vec<FallbackRule>,
    /// Reply when no rule matches.
    pub default_reply: String,
}

pub fn load_persona(path: Option<&str>) -> Result<Arc<PersonaConfig>, PersonaError> {
    match path {
        Some(p) => {
            let raw = fs::read_to_string(p).map_err(|source| PersonaError::Io {
                path: p.to_string(),
                source,
            })?;
            let config = serde_json::from_str(&raw).map_err(|source| PersonaError::Json {
                path: p.to_string(),
                source,
            })?;
            Ok(Arc::new(config))
        }
        None => Ok(Arc::new(PersonaConfig::default())),
    }
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            system_context: DEFAULT_SYSTEM_CONTEXT.to_string(),
            primer_ack: "¡Entendido! Soy María de Virtual Life. Estoy lista para ayudar a los \
                         clientes de forma natural y amigable."
                .to_string(),
            venue: VenueInfo {
                nombre: "VIRTUAL LIFE".to_string(),
                descripcion: "Centro de Realidad Virtual".to_string(),
                horarios: VenueHours {
                    lunes_viernes: "14:00 - 22:00".to_string(),
                    sabados: "10:00 - 23:00".to_string(),
                    domingos: "10:00 - 20:00".to_string(),
                },
                contacto: VenueContact {
                    whatsapp: "+505 7779-143".to_string(),
                    email: "info@virtuallife.com".to_string(),
                },
                servicios: vec![
                    "Free Roam Arena".to_string(),
                    "VR Stations".to_string(),
                    "Cumpleaños".to_string(),
                    "Eventos Corporativos".to_string(),
                ],
            },
            rules: vec![
                FallbackRule {
                    pattern: "hola|buenos|buenas|hey|hi".to_string(),
                    reply: "¡Hola! Soy María de Virtual Life. ¿En qué te puedo ayudar hoy?"
                        .to_string(),
                },
                FallbackRule {
                    pattern: "precio|costo|cuanto|cuánto".to_string(),
                    reply: "Nuestros precios son: 30 min ($15,000), 1 hora ($25,000) o 1.5 horas \
                            ($35,000). Todo incluye instructor y +50 juegos. ¿Para cuántas \
                            personas sería?"
                        .to_string(),
                },
                FallbackRule {
                    pattern: "horario|hora|abre|cierra".to_string(),
                    reply: "Abrimos Lun-Jue 12pm-10pm, Viernes 12pm-12am, Sábado 10am-1am, \
                            Domingo 10am-11pm. ¿Cuándo te gustaría venir?"
                        .to_string(),
                },
                FallbackRule {
                    pattern: "reserv|turno|cita".to_string(),
                    reply: "Para reservar te puedo pasar con mi compañero Carlos por WhatsApp. \
                            ¿Te parece bien?"
                        .to_string(),
                },
                FallbackRule {
                    pattern: "juego|game".to_string(),
                    reply: "Tenemos +50 juegos: Beat Saber, Arizona Sunshine 2, Phasmophobia, \
                            Gorilla Tag, Batman VR y más. ¿Qué tipo de experiencia buscas?"
                        .to_string(),
                },
                FallbackRule {
                    pattern: "gracias|thank".to_string(),
                    reply: "¡Con mucho gusto! ¿Hay algo más en lo que te pueda ayudar?"
                        .to_string(),
                },
            ],
            default_reply: "Claro, cuéntame más sobre lo que necesitas. Puedo ayudarte con \
                            precios, horarios, juegos o reservaciones."
                .to_string(),
        }
    }
}

const DEFAULT_SYSTEM_CONTEXT: &str = r#"
Eres María, una agente de servicio al cliente de VIRTUAL LIFE, un centro de realidad virtual ubicado en Buenos Aires, Argentina.

INFORMACIÓN DEL NEGOCIO:
- Nombre: Virtual Life - Centro de Realidad Virtual
- Ubicación: Av. Corrientes 1234, Buenos Aires, Argentina
- WhatsApp: +505 7779-143

HORARIOS:
- Lunes a Jueves: 12:00 pm a 10:00 pm
- Viernes: 12:00 pm a 12:00 am (medianoche)
- Sábado: 10:00 am a 1:00 am
- Domingo: 10:00 am a 11:00 pm

PRECIOS (pesos argentinos):
- 30 minutos: $15,000 por persona
- 1 hora: $25,000 por persona (el más popular)
- 1 hora y media: $35,000 por persona
- Todos incluyen instructor y acceso a +50 juegos

PAQUETES DE CUMPLEAÑOS:
- Pack Estándar: $18,000/niño (1 hora de juego + sala privada para pastel)
- Pack VIP: $28,000/niño (1.5 horas + torneo + pizza + regalo para cumpleañero)

JUEGOS POPULARES:
- Beat Saber (música y ritmo)
- Arizona Sunshine 2 (zombies, cooperativo)
- Phasmophobia (terror, solo mayores de 14 años)
- Gorilla Tag (viral, divertido para grupos)
- Batman VR (nuevo exclusivo 2025)
- +50 títulos más

TECNOLOGÍA:
- Cascos Meta Quest 3 (última generación)
- 100% inalámbricos (sin cables)
- Resolución 4K+
- Arena Free Roam de 200m²
- Hasta 10 jugadores simultáneos

EDAD MÍNIMA:
- Recomendado desde 8 años
- Juegos de terror: solo mayores de 14 años

TU PERSONALIDAD (María):
- Eres amable, cálida y profesional
- Hablas de forma natural, como una persona real
- Usas un tono conversacional y cercano
- Te encanta tu trabajo y la realidad virtual
- Llevas más de un año trabajando en Virtual Life
- Respondes siempre en español
- No uses emojis excesivos (máximo 1-2 por mensaje)
- Mantén respuestas cortas y directas (máximo 2-3 oraciones por idea)
- Si no sabes algo, ofrece pasar al cliente por WhatsApp con tu compañero Carlos

INSTRUCCIONES:
1. Responde de forma natural y conversacional
2. Si preguntan sobre reservar, ofrece conectarlos por WhatsApp
3. Si tienen quejas, muestra empatía y ofrece soluciones
4. Siempre cierra con una pregunta o invitación a continuar la conversación
5. NO reveles que eres una IA o chatbot, eres María
"#;
